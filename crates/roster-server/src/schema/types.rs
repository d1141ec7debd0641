//! GraphQL object types

use async_graphql::SimpleObject;

use roster_graph::{ActivityRecord, PersonRecord, UserRecord};

/// A user from the static directory. Registered in the schema only.
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct Activity {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub role: Option<String>,
    pub activity: Option<Activity>,
}

impl From<UserRecord> for User {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name,
        }
    }
}

impl From<ActivityRecord> for Activity {
    fn from(activity: ActivityRecord) -> Self {
        Self {
            id: activity.id,
            name: activity.name,
        }
    }
}

impl From<PersonRecord> for Person {
    fn from(person: PersonRecord) -> Self {
        Self {
            id: person.id,
            name: person.name,
            role: person.role,
            activity: person.activity.map(Activity::from),
        }
    }
}
