use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitbackError>;

#[derive(Error, Debug)]
pub enum GitbackError {
    #[error("No commit data to analyze")]
    NoData,
    #[error("Data error in record {record}: {reason}")]
    Data { record: String, reason: String },
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Object find error: {0}")]
    ObjectFind(#[from] Box<gix::object::find::existing::Error>),
    #[error("Commit error: {0}")]
    Commit(#[from] Box<gix::object::commit::Error>),
    #[error("Reference find error: {0}")]
    RefFind(#[from] Box<gix::reference::find::existing::Error>),
    #[error("Head peel error: {0}")]
    HeadPeel(#[from] Box<gix::head::peel::to_commit::Error>),
    #[error("Object find with conversion error: {0}")]
    ObjectFindConv(#[from] Box<gix::object::find::existing::with_conversion::Error>),
    #[error("Object decode error: {0}")]
    ObjectDecode(#[from] Box<gix::objs::decode::Error>),
    #[error("Diff tree to tree error: {0}")]
    DiffTreeToTree(#[from] Box<gix::repository::diff_tree_to_tree::Error>),
}

impl GitbackError {
    pub fn data(record: impl Into<String>, reason: impl Into<String>) -> Self {
        GitbackError::Data {
            record: record.into(),
            reason: reason.into(),
        }
    }
}

// gix errors are large; box them on the way in
impl From<gix::discover::Error> for GitbackError {
    fn from(err: gix::discover::Error) -> Self {
        GitbackError::GitDiscover(Box::new(err))
    }
}

impl From<gix::object::find::existing::Error> for GitbackError {
    fn from(err: gix::object::find::existing::Error) -> Self {
        GitbackError::ObjectFind(Box::new(err))
    }
}

impl From<gix::object::commit::Error> for GitbackError {
    fn from(err: gix::object::commit::Error) -> Self {
        GitbackError::Commit(Box::new(err))
    }
}

impl From<gix::reference::find::existing::Error> for GitbackError {
    fn from(err: gix::reference::find::existing::Error) -> Self {
        GitbackError::RefFind(Box::new(err))
    }
}

impl From<gix::head::peel::to_commit::Error> for GitbackError {
    fn from(err: gix::head::peel::to_commit::Error) -> Self {
        GitbackError::HeadPeel(Box::new(err))
    }
}

impl From<gix::object::find::existing::with_conversion::Error> for GitbackError {
    fn from(err: gix::object::find::existing::with_conversion::Error) -> Self {
        GitbackError::ObjectFindConv(Box::new(err))
    }
}

impl From<gix::objs::decode::Error> for GitbackError {
    fn from(err: gix::objs::decode::Error) -> Self {
        GitbackError::ObjectDecode(Box::new(err))
    }
}

impl From<gix::repository::diff_tree_to_tree::Error> for GitbackError {
    fn from(err: gix::repository::diff_tree_to_tree::Error) -> Self {
        GitbackError::DiffTreeToTree(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_names_the_record() {
        let err = GitbackError::data("abc1234", "negative files touched count: -3");
        assert_eq!(
            err.to_string(),
            "Data error in record abc1234: negative files touched count: -3"
        );
    }
}
