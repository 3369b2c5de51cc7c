/// Destination for the user-facing messages of a run.
///
/// Success notices and per-line diagnostics are part of the tool's
/// contract, separate from internal logging. The production sink writes
/// to the real console streams; tests inject a capturing sink instead.
pub trait ReportSink {
    /// A success notice, destined for stdout.
    fn notice(&mut self, msg: &str);

    /// A per-line diagnostic, destined for stderr.
    fn diagnostic(&mut self, msg: &str);
}

/// Writes notices to stdout and diagnostics to stderr.
pub struct Console;

impl ReportSink for Console {
    fn notice(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn diagnostic(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
}

/// Collects messages in memory for assertions.
#[cfg(test)]
#[derive(Default)]
pub struct Capture {
    pub notices: Vec<String>,
    pub diagnostics: Vec<String>,
}

#[cfg(test)]
impl ReportSink for Capture {
    fn notice(&mut self, msg: &str) {
        self.notices.push(msg.to_string());
    }

    fn diagnostic(&mut self, msg: &str) {
        self.diagnostics.push(msg.to_string());
    }
}
