/// Bearer token for the GitHub API.
///
/// Wraps the raw secret so it never ends up in log output by accident:
/// the `Debug` implementation redacts everything past the first four
/// characters.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let visible = self.0.chars().take(4).collect::<String>();
        write!(f, "Token({visible}****)")
    }
}
