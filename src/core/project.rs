//! Projects group tasks and define which people may be assigned to them.

use serde::{Deserialize, Serialize};

use super::person::PersonId;

uuid_id!(
    /// Unique identifier for a project.
    ProjectId
);

/// A project: the unit that scopes a dependency graph and its membership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    /// People allowed to receive assignments in this project.
    #[serde(default)]
    pub members: Vec<PersonId>,
}

impl Project {
    pub fn new(name: &str) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.to_string(),
            members: Vec::new(),
        }
    }

    /// Add a member, ignoring duplicates.
    pub fn add_member(&mut self, person: PersonId) {
        if !self.members.contains(&person) {
            self.members.push(person);
        }
    }

    pub fn is_member(&self, person: &PersonId) -> bool {
        self.members.contains(person)
    }
}
