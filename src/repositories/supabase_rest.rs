// src/repositories/supabase_rest.rs
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::query::Query;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("supabase error: {0}")]
    Supabase(String),
    #[error("not found")]
    NotFound,
    #[error("other: {0}")]
    Other(String),
}

/// Table access through Supabase PostgREST using the service role key.
#[derive(Clone)]
pub struct SupabaseRest {
    client: Client,
    base_rest_url: String,      // e.g. https://xyz.supabase.co/rest/v1
    service_role_key: String,
}

impl SupabaseRest {
    pub fn new(client: Client, supabase_url: &str, service_role_key: &str) -> Self {
        let trimmed = supabase_url.trim_end_matches('/');
        let base_rest_url = if trimmed.ends_with("/rest/v1") {
            trimmed.to_string()
        } else {
            format!("{}/rest/v1", trimmed)
        };

        Self {
            client,
            base_rest_url,
            service_role_key: service_role_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_rest_url, table)
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", self.service_role_key))
    }

    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
    ) -> Result<Vec<T>, RepoError> {
        let query = if query.has_select() { query } else { query.select("*") };
        let resp = self
            .authed(self.client.get(self.table_url(table)))
            .query(query.pairs())
            .send()
            .await?;
        read_rows(resp).await
    }

    /// First row matching `query`, or `RepoError::NotFound`.
    pub async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: Query,
    ) -> Result<T, RepoError> {
        let rows: Vec<T> = self.select(table, query.limit(1)).await?;
        rows.into_iter().next().ok_or(RepoError::NotFound)
    }

    pub async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, RepoError> {
        let resp = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = read_rows(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Other(format!("empty response from insert into {}", table)))
    }

    /// Insert-or-merge on the table's primary key.
    pub async fn upsert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T, RepoError> {
        let resp = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = read_rows(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Other(format!("empty response from upsert into {}", table)))
    }

    /// Updates matching rows and returns them. No rows matched is `NotFound`.
    pub async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        filter: Query,
        body: &B,
    ) -> Result<Vec<T>, RepoError> {
        let resp = self
            .authed(self.client.patch(self.table_url(table)))
            .header("Prefer", "return=representation")
            .query(filter.pairs())
            .json(body)
            .send()
            .await?;
        let rows: Vec<T> = read_rows(resp).await?;
        if rows.is_empty() {
            return Err(RepoError::NotFound);
        }
        Ok(rows)
    }

    pub async fn delete(&self, table: &str, filter: Query) -> Result<(), RepoError> {
        let resp = self
            .authed(self.client.delete(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .query(filter.pairs())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RepoError::Supabase(format!("{} -> {}", status.as_u16(), text)));
        }
        Ok(())
    }
}

async fn read_rows<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, RepoError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(RepoError::Supabase(format!("{} -> {}", status.as_u16(), text)));
    }
    Ok(serde_json::from_str(&text)?)
}
