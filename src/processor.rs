use std::{
    fs::{self, File},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
    sync::OnceLock,
};

use anyhow::Context;
use log::{debug, info};
use regex::Regex;

use crate::{
    record::{InvalidRecord, Record},
    report::ReportSink,
    template,
};

/// Converts a data file into one welcome-email file per valid record.
///
/// Holds the fixed run configuration (template path, output directory)
/// and the sink receiving the user-facing messages. All per-record state
/// is local to one loop iteration; nothing carries over between lines.
pub struct RecordProcessor<'a, S: ReportSink> {
    template_path: PathBuf,
    output_dir: PathBuf,
    report: &'a mut S,
}

impl<'a, S: ReportSink> RecordProcessor<'a, S> {
    pub fn new(template_path: PathBuf, output_dir: PathBuf, report: &'a mut S) -> Self {
        Self {
            template_path,
            output_dir,
            report,
        }
    }

    /// Processes every line of the data file.
    ///
    /// Validation failures are reported through the sink and skipped;
    /// any I/O failure on the data file, the template or an output file
    /// aborts the whole run.
    pub fn run(&mut self, data_path: &Path) -> anyhow::Result<()> {
        self.create_output_dir()?;

        let data_name = file_name_for_messages(data_path);
        debug!("Processing data file {data_path:?}");
        let file = File::open(data_path)
            .with_context(|| format!("Error al leer el archivo de obtención de datos {data_path:?}"))?;

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| {
                format!("Error al leer el archivo de obtención de datos {data_path:?}")
            })?;
            self.process_line(&line, index + 1, &data_name)?;
        }

        self.list_generated_files()?;
        Ok(())
    }

    /// Handles one data line. Line numbers are 1-indexed.
    fn process_line(&mut self, line: &str, number: usize, data_name: &str) -> anyhow::Result<()> {
        match Record::parse(line) {
            Ok(record) => {
                let rendered = template::render(&self.template_path, &record)?;
                if rendered.all_resolved {
                    self.write_welcome_email(&record.id, &rendered.lines)?;
                } else {
                    // Treated like missing data, without a field list
                    self.report
                        .diagnostic(&missing_data_message(number, &[], data_name));
                }
            }
            Err(InvalidRecord::TooFewFields) => {
                self.report
                    .diagnostic(&missing_data_message(number, &[], data_name));
            }
            Err(InvalidRecord::MissingFields(fields)) => {
                let names: Vec<String> = fields.iter().map(|field| field.to_string()).collect();
                self.report
                    .diagnostic(&missing_data_message(number, &names, data_name));
            }
        }
        Ok(())
    }

    /// Creates the output directory if absent. Reruns are fine, the notice
    /// is printed even when the directory already existed.
    fn create_output_dir(&mut self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Error al crear la carpeta de salida {:?}", self.output_dir))?;
        self.report.notice(&format!(
            "Se ha creado correctamente la carpeta {}:",
            self.output_dir.display()
        ));
        Ok(())
    }

    fn write_welcome_email(&mut self, id: &str, lines: &[String]) -> anyhow::Result<()> {
        let filename = format!("correoBienvenida-{id}.txt");
        let path = self.output_dir.join(&filename);
        debug!("Writing welcome email to {path:?}");

        let mut file = File::create(&path)
            .with_context(|| format!("Error al escribir el archivo de salida {path:?}"))?;
        for line in lines {
            file.write_all(line.as_bytes())
                .with_context(|| format!("Error al escribir el archivo de salida {path:?}"))?;
        }

        self.report
            .notice(&format!("Se ha creado correctamente el {filename}"));
        Ok(())
    }

    /// Post-run pass over the output directory. Observational only: the
    /// generated files are enumerated and logged, their contents are not
    /// printed.
    fn list_generated_files(&self) -> anyhow::Result<()> {
        if !self.output_dir.is_dir() {
            return Ok(());
        }
        let entries = fs::read_dir(&self.output_dir)
            .with_context(|| format!("Error al leer la carpeta de salida {:?}", self.output_dir))?;

        let mut count = 0;
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("Error al leer la carpeta de salida {:?}", self.output_dir)
            })?;
            let name = entry.file_name();
            if welcome_email_pattern().is_match(&name.to_string_lossy()) {
                debug!("Generated welcome email: {:?}", entry.path());
                count += 1;
            }
        }
        info!("{count} welcome email file(s) in {:?}", self.output_dir);
        Ok(())
    }
}

fn welcome_email_pattern() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r"^correoBienvenida-.*\.txt$").expect("failed to compile regex")
    })
}

/// Builds the diagnostic for a line with missing data. An empty field
/// list yields the short form used for lines with too few fields.
fn missing_data_message(number: usize, fields: &[String], data_name: &str) -> String {
    if fields.is_empty() {
        format!("Error: Faltan datos en la línea {number} en el archivo {data_name}")
    } else {
        format!(
            "Error: Faltan datos en la línea {number}, falta: {} en el archivo {data_name}",
            fields.join(", ")
        )
    }
}

/// File name component as shown in diagnostics.
fn file_name_for_messages(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Capture;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "Hello %%5%% from %%4%% in %%2%%, contact %%3%%\n";

    struct Fixture {
        // Holds the temp dir alive for the duration of a test
        _dir: TempDir,
        data_path: PathBuf,
        template_path: PathBuf,
        output_dir: PathBuf,
    }

    fn fixture(data: &str, template: &str) -> Fixture {
        let dir = TempDir::new().unwrap();
        let data_path = dir.path().join("data.csv");
        let template_path = dir.path().join("template.txt");
        fs::write(&data_path, data).unwrap();
        fs::write(&template_path, template).unwrap();
        let output_dir = dir.path().join("salida");
        Fixture {
            _dir: dir,
            data_path,
            template_path,
            output_dir,
        }
    }

    fn run(fx: &Fixture) -> Capture {
        let mut capture = Capture::default();
        let mut processor = RecordProcessor::new(
            fx.template_path.clone(),
            fx.output_dir.clone(),
            &mut capture,
        );
        processor.run(&fx.data_path).unwrap();
        capture
    }

    #[test]
    fn valid_record_writes_one_file() {
        // Arrange
        let fx = fixture("1,Acme,Springfield,a@b.com,Jane\n", TEMPLATE);

        // Act
        let capture = run(&fx);

        // Assert
        let written = fs::read_to_string(fx.output_dir.join("correoBienvenida-1.txt")).unwrap();
        assert_eq!(
            written,
            "Hello Jane from Acme in Springfield, contact a@b.com\n"
        );
        assert!(capture
            .notices
            .contains(&"Se ha creado correctamente el correoBienvenida-1.txt".to_string()));
        assert!(capture.diagnostics.is_empty());
    }

    #[test]
    fn empty_field_reports_and_writes_nothing() {
        // Arrange
        let data = "1,Acme,Springfield,a@b.com,Jane\n\
                    2,,Metropolis,c@d.com,Bob\n";
        let fx = fixture(data, TEMPLATE);

        // Act
        let capture = run(&fx);

        // Assert
        assert_eq!(
            capture.diagnostics,
            vec!["Error: Faltan datos en la línea 2, falta: empresa en el archivo data.csv"
                .to_string()]
        );
        assert!(!fx.output_dir.join("correoBienvenida-2.txt").exists());
    }

    #[test]
    fn short_line_reports_without_field_list() {
        // Arrange
        let data = "1,Acme,Springfield,a@b.com,Jane\n\
                    2,Beta,Gotham,e@f.com,Ana\n\
                    3,Acme\n";
        let fx = fixture(data, TEMPLATE);

        // Act
        let capture = run(&fx);

        // Assert
        assert_eq!(
            capture.diagnostics,
            vec!["Error: Faltan datos en la línea 3 en el archivo data.csv".to_string()]
        );
        assert!(!fx.output_dir.join("correoBienvenida-3.txt").exists());
    }

    #[test]
    fn several_empty_fields_listed_in_order() {
        let fx = fixture(",Acme,,c@d.com,\n", TEMPLATE);
        let capture = run(&fx);
        assert_eq!(
            capture.diagnostics,
            vec![
                "Error: Faltan datos en la línea 1, falta: id, ciudad, empleado en el archivo data.csv"
                    .to_string()
            ]
        );
    }

    #[test]
    fn line_numbers_are_one_indexed_and_processing_continues() {
        // Arrange
        let data = "1,Acme,Springfield,a@b.com,Jane\n\
                    2,,Metropolis,c@d.com,Bob\n\
                    3,Acme,Gotham,e@f.com,Ana\n";
        let fx = fixture(data, TEMPLATE);

        // Act
        let capture = run(&fx);

        // Assert
        assert!(fx.output_dir.join("correoBienvenida-1.txt").exists());
        assert!(fx.output_dir.join("correoBienvenida-3.txt").exists());
        assert!(!fx.output_dir.join("correoBienvenida-2.txt").exists());
        assert_eq!(capture.diagnostics.len(), 1);
        assert!(capture.diagnostics[0].contains("línea 2"));
    }

    #[test]
    fn unresolved_placeholder_reports_and_writes_nothing() {
        // Arrange
        let fx = fixture(
            "1,Acme,Springfield,a@b.com,Jane\n",
            "Hola %%5%%\nDesde %%7%%\n",
        );

        // Act
        let capture = run(&fx);

        // Assert
        assert_eq!(
            capture.diagnostics,
            vec!["Error: Faltan datos en la línea 1 en el archivo data.csv".to_string()]
        );
        assert!(!fx.output_dir.join("correoBienvenida-1.txt").exists());
    }

    #[test]
    fn rerun_overwrites_existing_output() {
        // Arrange
        let fx = fixture("1,Acme,Springfield,a@b.com,Jane\n", TEMPLATE);

        // Act
        run(&fx);
        let first = fs::read_to_string(fx.output_dir.join("correoBienvenida-1.txt")).unwrap();
        run(&fx);
        let second = fs::read_to_string(fx.output_dir.join("correoBienvenida-1.txt")).unwrap();

        // Assert
        assert_eq!(first, second);
        assert_eq!(fs::read_dir(&fx.output_dir).unwrap().count(), 1);
    }

    #[test]
    fn directory_notice_emitted_once_per_run() {
        let fx = fixture("1,Acme,Springfield,a@b.com,Jane\n", TEMPLATE);
        let capture = run(&fx);
        let dir_notices = capture
            .notices
            .iter()
            .filter(|n| n.starts_with("Se ha creado correctamente la carpeta"))
            .count();
        assert_eq!(dir_notices, 1);
    }

    #[test]
    fn missing_data_file_is_fatal() {
        // Arrange
        let fx = fixture("", TEMPLATE);
        let mut capture = Capture::default();
        let mut processor = RecordProcessor::new(
            fx.template_path.clone(),
            fx.output_dir.clone(),
            &mut capture,
        );

        // Act
        let actual = processor.run(Path::new("no-existe.csv"));

        // Assert
        assert!(actual.is_err());
    }

    #[test]
    fn missing_template_is_fatal() {
        // Only surfaces once a valid record needs rendering
        let dir = TempDir::new().unwrap();
        let data_path = dir.path().join("data.csv");
        fs::write(&data_path, "1,Acme,Springfield,a@b.com,Jane\n").unwrap();
        let mut capture = Capture::default();
        let mut processor = RecordProcessor::new(
            dir.path().join("no-existe.txt"),
            dir.path().join("salida"),
            &mut capture,
        );
        assert!(processor.run(&data_path).is_err());
    }

    #[rstest]
    #[case("correoBienvenida-1.txt", true)]
    #[case("correoBienvenida-abc.txt", true)]
    #[case("correoBienvenida-.txt", true)]
    #[case("otro-1.txt", false)]
    #[case("correoBienvenida-1.log", false)]
    fn welcome_email_filename_matching(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(welcome_email_pattern().is_match(name), expected);
    }
}
