use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerName(String);

impl CustomerName {
    /// Trims the input and rejects blank, overlong or markup-bearing names.
    pub fn parse(s: String) -> Result<CustomerName, String> {
        let s = s.trim().to_string();
        let is_empty = s.is_empty();
        let is_too_long = s.graphemes(true).count() > 256;
        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = s.chars().any(|g| forbidden_characters.contains(&g));

        if is_empty {
            Err("O nome do cliente não pode ficar em branco.".to_string())
        } else if is_too_long {
            Err("O nome do cliente é longo demais.".to_string())
        } else if contains_forbidden_characters {
            Err(format!("O nome {} contém caracteres inválidos.", s))
        } else {
            Ok(Self(s))
        }
    }
}

impl AsRef<str> for CustomerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
