use std::path::Path;

use anyhow::{anyhow, Context as _};
use mongodb::bson::{Bson, Document};
use serde::Deserialize;
use tokio::fs;

use crate::OutputFormat;

/// Settings that may be given in a JSON or YAML file instead of on the command line. Command line
/// arguments and environment variables take precedence over values from the file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigurationFile {
    pub connection_uri: Option<String>,
    pub database: Option<String>,
    pub collection: Option<String>,
    pub format: Option<OutputFormat>,

    /// Documents to seed in place of the tea ratings, written as extended JSON
    pub seed: Option<Vec<serde_json::Value>>,
}

impl ConfigurationFile {
    /// Converts seed documents from extended JSON.
    pub fn seed_documents(&self) -> anyhow::Result<Option<Vec<Document>>> {
        let Some(seed) = &self.seed else {
            return Ok(None);
        };
        let documents = seed
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let bson = Bson::try_from(value.clone())
                    .with_context(|| format!("seed document {index} is not valid extended JSON"))?;
                match bson {
                    Bson::Document(document) => Ok(document),
                    other => Err(anyhow!(
                        "seed document {index} must be an object, but found {:?}",
                        other.element_type()
                    )),
                }
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Some(documents))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "yaml" | "yml" => Some(FileFormat::Yaml),
            _ => None,
        }
    }
}

pub async fn read_configuration_file(path: impl AsRef<Path>) -> anyhow::Result<ConfigurationFile> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path).ok_or_else(|| {
        anyhow!(
            "cannot tell the format of {:?}; expected a .json, .yaml, or .yml extension",
            path
        )
    })?;
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("error reading {path:?}"))?;
    tracing::debug!(path = %path.display(), ?format, "read configuration file");
    let configuration = match format {
        FileFormat::Json => {
            serde_json::from_slice(&bytes).with_context(|| format!("error parsing {path:?}"))?
        }
        FileFormat::Yaml => {
            serde_yaml::from_slice(&bytes).with_context(|| format!("error parsing {path:?}"))?
        }
    };
    Ok(configuration)
}

#[cfg(test)]
mod tests {
    use async_tempfile::TempDir;
    use mongodb::bson::doc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn reads_json_configuration() -> anyhow::Result<()> {
        let dir = TempDir::new().await?;
        let path = dir.join("sort-examples.json");
        fs::write(
            &path,
            r#"{ "connectionUri": "mongodb://localhost:27017", "collection": "teas", "format": "relaxed" }"#,
        )
        .await?;

        let configuration = read_configuration_file(&path).await?;
        assert_eq!(
            configuration,
            ConfigurationFile {
                connection_uri: Some("mongodb://localhost:27017".to_owned()),
                collection: Some("teas".to_owned()),
                format: Some(OutputFormat::Relaxed),
                ..Default::default()
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn reads_yaml_configuration_with_seed_documents() -> anyhow::Result<()> {
        let dir = TempDir::new().await?;
        let path = dir.join("sort-examples.yml");
        fs::write(
            &path,
            "database: tasting\nseed:\n  - type: Sencha\n    rating: 9\n  - type: Chai\n    rating: { \"$numberLong\": \"4\" }\n",
        )
        .await?;

        let configuration = read_configuration_file(&path).await?;
        assert_eq!(configuration.database.as_deref(), Some("tasting"));
        assert_eq!(
            configuration.seed_documents()?,
            Some(vec![
                doc! { "type": "Sencha", "rating": 9 },
                doc! { "type": "Chai", "rating": 4_i64 },
            ])
        );
        Ok(())
    }

    #[tokio::test]
    async fn rejects_unknown_settings() -> anyhow::Result<()> {
        let dir = TempDir::new().await?;
        let path = dir.join("sort-examples.json");
        fs::write(&path, r#"{ "colection": "typo" }"#).await?;
        assert!(read_configuration_file(&path).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn rejects_unrecognized_extension() {
        let result = read_configuration_file("sort-examples.toml").await;
        assert!(result.is_err());
    }

    #[test]
    fn rejects_seed_values_that_are_not_documents() {
        let configuration = ConfigurationFile {
            seed: Some(vec![serde_json::json!([1, 2])]),
            ..Default::default()
        };
        assert!(configuration.seed_documents().is_err());
    }
}
