// src/common/validation.rs

use std::borrow::Cow;

use validator::ValidationError;

/// Recusa textos vazios ou só com espaços (o `length` do validator não apara).
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("O campo não pode ficar em branco.")));
    }
    Ok(())
}

/// Pelo menos `min` caracteres depois de aparar os espaços.
pub fn min_trimmed_chars(value: &str, min: usize) -> Result<(), ValidationError> {
    if value.trim().chars().count() < min {
        let mut err = ValidationError::new("length");
        err.add_param(Cow::Borrowed("min"), &min);
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Placa", true)]
    #[case("  x ", true)]
    #[case("", false)]
    #[case("   ", false)]
    #[case("\t\n", false)]
    fn blank_detection(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(not_blank(value).is_ok(), ok);
    }

    #[test]
    fn trimmed_length_ignores_padding() {
        assert!(min_trimmed_chars("  a  ", 2).is_err());
        assert!(min_trimmed_chars(" Jô ", 2).is_ok());
    }
}
