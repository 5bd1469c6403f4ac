use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::AutomationError;

/// Represents ways to locate an element on a portal page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// Raw CSS selector handed to the engine untouched
    Css(String),
    /// Select by element id attribute
    Id(String),
    /// Select by a single class name
    ClassName(String),
    /// Select by tag name
    Tag(String),
    /// Select by visible text content
    Text(String),
    /// Select by the `name` attribute (form controls)
    Name(String),
    /// Select the n-th element from the matches
    Nth(i32),
    /// Chain multiple selectors, each one scoped to the previous match
    Chain(Vec<Selector>),
    /// Represents an invalid selector string, with a reason.
    Invalid(String),
}

const KNOWN_TAGS: &[&str] = &[
    "a", "button", "div", "img", "input", "select", "span", "table", "tbody", "td", "th", "tr",
];

impl Selector {
    /// Check the selector (and every link of a chain) before it reaches an engine.
    pub fn validate(&self) -> Result<(), AutomationError> {
        match self {
            Selector::Invalid(reason) => Err(AutomationError::InvalidSelector(reason.clone())),
            Selector::Chain(parts) if parts.is_empty() => Err(AutomationError::InvalidSelector(
                "empty selector chain".to_string(),
            )),
            Selector::Chain(parts) => parts.iter().try_for_each(Selector::validate),
            Selector::Css(s)
            | Selector::Id(s)
            | Selector::ClassName(s)
            | Selector::Tag(s)
            | Selector::Name(s)
                if s.trim().is_empty() =>
            {
                Err(AutomationError::InvalidSelector(format!(
                    "empty value in selector {self}"
                )))
            }
            _ => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Css(css) => write!(f, "css:{css}"),
            Selector::Id(id) if is_plain_id(id) => write!(f, "#{id}"),
            Selector::Id(id) => write!(f, "id:{id}"),
            Selector::ClassName(class) => write!(f, "class:{class}"),
            Selector::Tag(tag) => write!(f, "tag:{tag}"),
            Selector::Text(text) => write!(f, "text:{text}"),
            Selector::Name(name) => write!(f, "name:{name}"),
            Selector::Nth(index) => write!(f, "nth:{index}"),
            Selector::Chain(parts) => {
                let rendered: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                write!(f, "{}", rendered.join(" >> "))
            }
            Selector::Invalid(reason) => write!(f, "invalid:{reason}"),
        }
    }
}

fn is_plain_id(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '>' | '.' | '[' | ':' | ','))
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        let s = s.trim();

        // Handle chained selectors first
        let parts: Vec<&str> = s.split(">>").map(|p| p.trim()).collect();
        if parts.len() > 1 {
            return Selector::Chain(parts.into_iter().map(Selector::from).collect());
        }

        let lower = s.to_lowercase();
        match s {
            _ if lower.starts_with("css:") => Selector::Css(s["css:".len()..].trim().to_string()),
            _ if lower.starts_with("classname:") => {
                Selector::ClassName(s["classname:".len()..].trim().to_string())
            }
            _ if lower.starts_with("class:") => {
                Selector::ClassName(s["class:".len()..].trim().to_string())
            }
            _ if lower.starts_with("tag:") => {
                Selector::Tag(s["tag:".len()..].trim().to_lowercase())
            }
            _ if lower.starts_with("text:") => Selector::Text(s["text:".len()..].to_string()),
            _ if lower.starts_with("name:") => Selector::Name(s["name:".len()..].trim().to_string()),
            _ if lower.starts_with("invalid:") => {
                Selector::Invalid(s["invalid:".len()..].to_string())
            }
            _ if lower.starts_with("id:") => Selector::Id(s["id:".len()..].trim().to_string()),
            _ if lower.starts_with("nth=") || lower.starts_with("nth:") => {
                let index_str = s["nth:".len()..].trim();
                if let Ok(index) = index_str.parse::<i32>() {
                    Selector::Nth(index)
                } else {
                    Selector::Invalid(format!("Invalid index for nth selector: '{index_str}'"))
                }
            }
            _ if s.starts_with('#') && is_plain_id(&s[1..]) => Selector::Id(s[1..].to_string()),
            _ if s.starts_with('#') || s.starts_with('.') || s.starts_with('[') => {
                Selector::Css(s.to_string())
            }
            _ if KNOWN_TAGS.contains(&lower.as_str()) => Selector::Tag(lower),
            _ => Selector::Invalid(format!(
                "Unknown selector format: \"{s}\". Use prefixes like 'css:', 'id:', 'class:', 'tag:', 'text:', 'name:' or 'nth:' to specify the selector type."
            )),
        }
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        Selector::from(s.as_str())
    }
}

impl Serialize for Selector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Selector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Selector::from(raw.as_str()))
    }
}
