//! Root query type

use async_graphql::{Context, ErrorExtensions, Object};

use roster_graph::{FetchError, PersonClient};

use super::types::Person;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Looks up one person by id
    async fn person(&self, ctx: &Context<'_>, id: Option<String>) -> async_graphql::Result<Option<Person>> {
        let client = ctx.data::<PersonClient>()?;
        let person = client.fetch_one(id.as_deref()).await.map_err(to_graphql_error)?;
        Ok(Some(person.into()))
    }

    /// Lists every person
    async fn persons(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<Vec<Person>>> {
        let client = ctx.data::<PersonClient>()?;
        let persons = client.fetch_all().await.map_err(to_graphql_error)?;
        Ok(Some(persons.into_iter().map(Person::from).collect()))
    }
}

/// Field error carrying the fetch failure's code in `extensions.code`
pub fn to_graphql_error(err: FetchError) -> async_graphql::Error {
    let code = err.code().to_string();
    async_graphql::Error::new(err.to_string()).extend_with(|_, ext| ext.set("code", code))
}
