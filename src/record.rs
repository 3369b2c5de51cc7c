use std::fmt::Display;

/// One validated line of the data file.
///
/// The input line carries the fields positionally (id, empresa, ciudad,
/// email, empleado); parsing converts them into named fields so nothing
/// downstream indexes into a split line again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub empresa: String,
    pub ciudad: String,
    pub email: String,
    pub empleado: String,
}

/// Domain label for each required field, in the order they appear on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Empresa,
    Ciudad,
    Email,
    Empleado,
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Field::Id => "id",
            Field::Empresa => "empresa",
            Field::Ciudad => "ciudad",
            Field::Email => "email",
            Field::Empleado => "empleado",
        };
        write!(f, "{label}")
    }
}

/// Why a line could not become a [`Record`].
#[derive(Debug, PartialEq, Eq)]
pub enum InvalidRecord {
    /// Splitting on the delimiter yielded fewer than five fields. No
    /// per-field detail is reported in this case.
    TooFewFields,
    /// Five or more fields were present but at least one required field
    /// was empty. Fields are listed in line order.
    MissingFields(Vec<Field>),
}

impl Record {
    pub const FIELD_COUNT: usize = 5;
    pub const DELIMITER: char = ',';

    /// Splits a data line and validates the five required fields.
    pub fn parse(line: &str) -> Result<Record, InvalidRecord> {
        let fields: Vec<&str> = line.split(Self::DELIMITER).collect();
        if fields.len() < Self::FIELD_COUNT {
            return Err(InvalidRecord::TooFewFields);
        }

        let record = Record {
            id: fields[0].to_string(),
            empresa: fields[1].to_string(),
            ciudad: fields[2].to_string(),
            email: fields[3].to_string(),
            empleado: fields[4].to_string(),
        };

        let mut missing = Vec::new();
        if record.id.is_empty() {
            missing.push(Field::Id);
        }
        if record.empresa.is_empty() {
            missing.push(Field::Empresa);
        }
        if record.ciudad.is_empty() {
            missing.push(Field::Ciudad);
        }
        if record.email.is_empty() {
            missing.push(Field::Email);
        }
        if record.empleado.is_empty() {
            missing.push(Field::Empleado);
        }

        if missing.is_empty() {
            Ok(record)
        } else {
            Err(InvalidRecord::MissingFields(missing))
        }
    }
}
