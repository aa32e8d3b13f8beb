//! Cloud Storage bucket and object probes

use crate::probe::client::{array_field, str_field};
use crate::probe::{ProbeClient, ProbeResult};

/// Summary of one storage bucket
#[derive(Debug, Clone, PartialEq)]
pub struct BucketSummary {
    pub name: String,
    pub location: String,
    pub storage_class: String,
    pub time_created: String,
}

/// Summary of one object inside a bucket
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSummary {
    pub name: String,
    /// Size in bytes, as the API reports it (a decimal string)
    pub size: String,
}

impl ProbeClient {
    /// List the project's buckets
    pub async fn buckets(&self) -> ProbeResult<Vec<BucketSummary>> {
        let url = format!(
            "{}/storage/v1/b?project={}",
            self.endpoints.storage, self.project_id
        );
        self.get_json(&url).await.map(|v| {
            array_field(&v, "items")
                .into_iter()
                .map(|b| BucketSummary {
                    name: str_field(b, "name"),
                    location: str_field(b, "location"),
                    storage_class: str_field(b, "storageClass"),
                    time_created: str_field(b, "timeCreated"),
                })
                .collect()
        })
    }

    /// List the first `max_results` objects of one bucket
    pub async fn bucket_objects(
        &self,
        bucket: &str,
        max_results: u32,
    ) -> ProbeResult<Vec<ObjectSummary>> {
        let url = format!(
            "{}/storage/v1/b/{}/o?maxResults={}",
            self.endpoints.storage, bucket, max_results
        );
        self.get_json(&url).await.map(|v| {
            array_field(&v, "items")
                .into_iter()
                .map(|o| ObjectSummary {
                    name: str_field(o, "name"),
                    size: str_field(o, "size"),
                })
                .collect()
        })
    }
}
