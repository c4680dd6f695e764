// src/common/csv.rs

use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    // Padrão do Excel em pt-BR
    #[default]
    Semicolon,
    Comma,
}

impl Delimiter {
    pub fn as_char(&self) -> char {
        match self {
            Delimiter::Semicolon => ';',
            Delimiter::Comma => ',',
        }
    }
}

/// Escritor CSV mínimo: aspas só quando necessário, linhas terminadas em CRLF.
pub struct CsvWriter {
    delimiter: char,
    buf: String,
}

impl CsvWriter {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter: delimiter.as_char(), buf: String::new() }
    }

    pub fn write_row<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, field) in fields.into_iter().enumerate() {
            if i > 0 {
                self.buf.push(self.delimiter);
            }
            self.push_field(field.as_ref());
        }
        self.buf.push_str("\r\n");
    }

    fn push_field(&mut self, field: &str) {
        let needs_quotes = field.contains(self.delimiter)
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r');

        if needs_quotes {
            self.buf.push('"');
            self.buf.push_str(&field.replace('"', "\"\""));
            self.buf.push('"');
        } else {
            self.buf.push_str(field);
        }
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_are_not_quoted() {
        let mut w = CsvWriter::new(Delimiter::Semicolon);
        w.write_row(["Nome", "Placa"]);
        w.write_row(["Ana", "ABC1D23"]);
        assert_eq!(w.finish(), "Nome;Placa\r\nAna;ABC1D23\r\n");
    }

    #[test]
    fn quotes_delimiter_quotes_and_newlines() {
        let mut w = CsvWriter::new(Delimiter::Comma);
        w.write_row(["Campinas, SP", "diz \"oi\"", "linha\nquebrada", "ok;ok"]);
        assert_eq!(
            w.finish(),
            "\"Campinas, SP\",\"diz \"\"oi\"\"\",\"linha\nquebrada\",ok;ok\r\n"
        );
    }

    #[test]
    fn semicolon_is_the_default() {
        assert_eq!(Delimiter::default().as_char(), ';');
    }
}
