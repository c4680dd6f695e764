// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Idioma das mensagens de erro, extraído do cabeçalho `Accept-Language`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale("pt".to_string())
    }
}

impl Locale {
    pub fn is_english(&self) -> bool {
        self.0 == "en"
    }

    // Só temos mensagens em português e inglês
    fn from_header(header_str: &str) -> Locale {
        accept_language::parse(header_str)
            .iter()
            // "pt-BR" -> "pt"
            .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
            .find(|lang| lang == "pt" || lang == "en")
            .map(Locale)
            .unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(lang)
    }
}

#[cfg(test)]
mod tests {
    use super::Locale;
    use rstest::rstest;

    #[rstest]
    #[case("en-US,en;q=0.9", "en")]
    #[case("en-GB", "en")]
    #[case("pt-BR,pt;q=0.9,en;q=0.8", "pt")]
    #[case("fr-FR", "pt")]
    #[case("", "pt")]
    fn picks_supported_language(#[case] header: &str, #[case] expected: &str) {
        assert_eq!(Locale::from_header(header).0, expected);
    }
}
