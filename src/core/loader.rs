use crate::core::{ConfigProvider, DataSource, SubgroupRecord};
use crate::utils::error::{NpChartError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Fetches the subgroup table with a single GET.
pub struct HttpLoader {
    url: String,
    client: Client,
}

impl HttpLoader {
    pub fn new(url: impl Into<String>, client: Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| NpChartError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self::new(config.data_url(), client))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn unavailable(&self, reason: impl ToString) -> NpChartError {
        NpChartError::DataUnavailable {
            url: self.url.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl DataSource for HttpLoader {
    async fn load(&self) -> Result<Vec<SubgroupRecord>> {
        tracing::debug!("Making request to: {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if !status.is_success() {
            return Err(self.unavailable(format!("HTTP status {}", status)));
        }

        let body = response.bytes().await.map_err(|e| self.unavailable(e))?;
        tracing::debug!("Received {} bytes", body.len());

        parse_records(&body).map_err(|e| self.unavailable(format!("malformed CSV: {}", e)))
    }
}

/// Parses the CSV payload, keeping row order.
pub fn parse_records(data: &[u8]) -> std::result::Result<Vec<SubgroupRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    reader.deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    const SAMPLE_CSV: &str = "sub_group,sub_group_size,number_of_defective_units\n\
                              1,100,4\n\
                              2,100,2\n\
                              3,100,7\n";

    #[test]
    fn test_parse_records_keeps_order() {
        let records = parse_records(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(
            records,
            vec![
                SubgroupRecord::new(1, 100, 4),
                SubgroupRecord::new(2, 100, 2),
                SubgroupRecord::new(3, 100, 7),
            ]
        );
    }

    #[test]
    fn test_parse_records_trims_and_accepts_aliases() {
        let csv = "subgroup, subgroup_size, defective\n 1 , 50 , 3 \n2,50,0\n";
        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0], SubgroupRecord::new(1, 50, 3));
    }

    #[test]
    fn test_parse_records_rejects_schema_mismatch() {
        let missing_column = "sub_group,sub_group_size\n1,100\n";
        assert!(parse_records(missing_column.as_bytes()).is_err());

        let negative = "sub_group,sub_group_size,number_of_defective_units\n1,100,-2\n";
        assert!(parse_records(negative.as_bytes()).is_err());

        let text = "sub_group,sub_group_size,number_of_defective_units\n1,abc,2\n";
        assert!(parse_records(text.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_records_header_only_is_empty() {
        let csv = "sub_group,sub_group_size,number_of_defective_units\n";
        assert!(parse_records(csv.as_bytes()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_successful_response() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/data_104_np.csv");
            then.status(200)
                .header("Content-Type", "text/plain")
                .body(SAMPLE_CSV);
        });

        let loader = HttpLoader::new(server.url("/data_104_np.csv"), Client::new());
        let records = loader.load().await.unwrap();

        api_mock.assert();
        assert_eq!(records.len(), 3);
        assert_eq!(records[2].defective, 7);
    }

    #[tokio::test]
    async fn test_load_http_error_is_data_unavailable() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET).path("/missing.csv");
            then.status(404);
        });

        let loader = HttpLoader::new(server.url("/missing.csv"), Client::new());
        let result = loader.load().await;

        api_mock.assert();
        match result {
            Err(NpChartError::DataUnavailable { url, reason }) => {
                assert!(url.ends_with("/missing.csv"));
                assert!(reason.contains("404"));
            }
            other => panic!("expected DataUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_malformed_body_is_data_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/bad.csv");
            then.status(200).body("id,name\n1,widget\n");
        });

        let loader = HttpLoader::new(server.url("/bad.csv"), Client::new());
        assert!(matches!(
            loader.load().await,
            Err(NpChartError::DataUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_connection_refused_is_data_unavailable() {
        // Port 9 (discard) is not served by anything in the test environment.
        let loader = HttpLoader::new("http://127.0.0.1:9/data.csv", Client::new());
        assert!(matches!(
            loader.load().await,
            Err(NpChartError::DataUnavailable { .. })
        ));
    }
}
