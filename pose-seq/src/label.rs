//! Class label resolution from record file names.

use crate::{common::*, error::SeqError};

/// Insertion-ordered mapping from label tokens to class ids.
///
/// A token receives the next unused id the first time it is seen. The table
/// built over a training split is meant to be reused for the matching
/// validation split so both agree on the ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelTable {
    names: IndexSet<String>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let table: Self = serde_json::from_str(&text)
            .with_context(|| format!("invalid label table '{}'", path.display()))?;
        Ok(table)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    pub fn get_or_insert(&mut self, token: &str) -> usize {
        match self.names.get_index_of(token) {
            Some(id) => id,
            None => self.names.insert_full(token.to_owned()).0,
        }
    }

    pub fn get(&self, token: &str) -> Option<usize> {
        self.names.get_index_of(token)
    }

    pub fn name(&self, id: usize) -> Option<&str> {
        self.names.get_index(id).map(String::as_str)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S> FromIterator<S> for LabelTable
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// The strategy that derives a class id from a record path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelResolver {
    /// The file name up to the first `_` is looked up in, or added to, the table.
    Token(LabelTable),
    /// The file stem embeds a one-based action code after its first `A`,
    /// e.g. `S001C002P003R002A013`.
    ActionCode,
}

impl LabelResolver {
    pub fn resolve(&mut self, path: &Path) -> Result<usize, SeqError> {
        match self {
            Self::Token(table) => {
                let file_name = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .ok_or_else(|| SeqError::decode(path, "file name is not valid UTF-8"))?;
                Ok(table.get_or_insert(label_token(file_name)))
            }
            Self::ActionCode => {
                let stem = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .ok_or_else(|| SeqError::decode(path, "file name is not valid UTF-8"))?;
                parse_action_code(stem).ok_or_else(|| {
                    SeqError::decode(path, format!("no action code found in '{}'", stem))
                })
            }
        }
    }

    pub fn label_table(&self) -> Option<&LabelTable> {
        match self {
            Self::Token(table) => Some(table),
            Self::ActionCode => None,
        }
    }

    pub fn into_label_table(self) -> Option<LabelTable> {
        match self {
            Self::Token(table) => Some(table),
            Self::ActionCode => None,
        }
    }
}

/// Returns the label token of a file name, which is its prefix before the first `_`.
pub fn label_token(file_name: &str) -> &str {
    match file_name.split_once('_') {
        Some((token, _)) => token,
        None => file_name,
    }
}

/// Parses the zero-based class id from the action code after the first `A`.
pub fn parse_action_code(stem: &str) -> Option<usize> {
    let (_, code) = stem.split_once('A')?;
    let code: usize = code.parse().ok()?;
    code.checked_sub(1)
}
