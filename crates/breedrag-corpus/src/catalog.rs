use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use breedrag_core::error::{Error, Result};
use breedrag_core::traits::CorpusSource;
use breedrag_core::types::{Document, META_BREED, META_SUB_BREED};

/// Breed name to its sub-breeds, in the catalog's alphabetical order.
pub type BreedList = BTreeMap<String, Vec<String>>;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    message: T,
    status: String,
}

/// Client for the dog breed catalog (`/api/breeds/list/all` and friends).
pub struct BreedCatalog {
    base_url: String,
    client: Client,
}

impl BreedCatalog {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { base_url: base_url.into().trim_end_matches('/').to_string(), client })
    }

    pub async fn list_breeds(&self) -> Result<BreedList> {
        self.get_message("/api/breeds/list/all")
            .await
            .map_err(|e| Error::UpstreamFetch(format!("Failed to fetch dog breeds: {e}")))
    }

    /// The first `count` image URLs for `breed`.
    pub async fn breed_images(&self, breed: &str, count: usize) -> Result<Vec<String>> {
        let mut images: Vec<String> = self
            .get_message(&format!("/api/breed/{breed}/images"))
            .await
            .map_err(|e| Error::UpstreamFetch(format!("Failed to fetch images for breed {breed}: {e}")))?;
        images.truncate(count);
        Ok(images)
    }

    pub async fn random_breed_image(&self, breed: &str) -> Result<String> {
        self.get_message(&format!("/api/breed/{breed}/images/random"))
            .await
            .map_err(|e| Error::UpstreamFetch(format!("Failed to fetch random image for breed {breed}: {e}")))
    }

    async fn get_message<T: DeserializeOwned>(&self, path: &str) -> std::result::Result<T, String> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).send().await.map_err(|e| e.to_string())?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("{url} returned HTTP {status}"));
        }
        let body: Envelope<T> = resp.json().await.map_err(|e| e.to_string())?;
        if body.status != "success" {
            return Err(format!("{url} reported status '{}'", body.status));
        }
        Ok(body.message)
    }
}

#[async_trait]
impl CorpusSource for BreedCatalog {
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_corpus(&self) -> Result<Vec<Document>> {
        let breeds = self.list_breeds().await.inspect_err(|e| warn!(error = %e, "breed catalog unavailable"))?;
        let documents = breed_documents(&breeds);
        info!(breeds = breeds.len(), documents = documents.len(), "fetched breed catalog");
        Ok(documents)
    }
}

/// One document per breed, each followed by one per sub-breed.
pub fn breed_documents(breeds: &BreedList) -> Vec<Document> {
    let mut documents = Vec::new();
    for (breed, sub_breeds) in breeds {
        documents.push(
            Document::new(breed.clone(), breed_text(breed, sub_breeds))
                .with_meta(META_BREED, breed.clone())
                .with_meta("subBreeds", sub_breeds.join(",")),
        );
        for sub in sub_breeds {
            documents.push(
                Document::new(format!("{breed}-{sub}"), sub_breed_text(breed, sub))
                    .with_meta(META_BREED, breed.clone())
                    .with_meta(META_SUB_BREED, sub.clone()),
            );
        }
    }
    documents
}

pub fn breed_text(breed: &str, sub_breeds: &[String]) -> String {
    if sub_breeds.is_empty() {
        format!("Dog breed: {breed}. This breed has no sub-breeds. ")
    } else {
        format!("Dog breed: {breed}. This breed has the following sub-breeds: {}. ", sub_breeds.join(", "))
    }
}

pub fn sub_breed_text(breed: &str, sub_breed: &str) -> String {
    format!("Dog sub-breed: {sub_breed} {breed}. This is a variety of the {breed} breed.")
}
