//! Structured key/value tags attached to message and block results.

use serde::{Deserialize, Serialize};

pub const ACTION: &str = "action";
pub const PROPOSAL_ID: &str = "proposalId";
pub const PROPOSER: &str = "proposer";
pub const DEPOSITER: &str = "depositer";
pub const VOTER: &str = "voter";
pub const VOTING_PERIOD_START: &str = "votingPeriodStart";

pub const ACTION_SUBMIT_PROPOSAL: &str = "submitProposal";
pub const ACTION_DEPOSIT: &str = "deposit";
pub const ACTION_VOTE: &str = "vote";
pub const ACTION_PROPOSAL_DROPPED: &str = "proposalDropped";
pub const ACTION_PROPOSAL_PASSED: &str = "proposalPassed";
pub const ACTION_PROPOSAL_REJECTED: &str = "proposalRejected";
pub const ACTION_EXECUTION_FAILED: &str = "executionFailed";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Tags in emission order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags(Vec<Tag>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl ToString) {
        self.0.push(Tag {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    /// Append a tag and return `self`, for building tag lists inline.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    pub fn extend(&mut self, other: Tags) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    /// Values of every tag with `key`, in order.
    pub fn values_of<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }

    /// Value of the first tag with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }
}
