use super::*;

impl RemoteClient {
    pub fn experiment_table(&self, filter: &FilterPredicate) -> Result<ExperimentTable> {
        let html = with_retries("load experiment table", || {
            tracing::debug!(filter = %filter.label(), "POST /experiment-table");
            let resp = self
                .client
                .post(self.url("/experiment-table"))
                .json(filter)
                .send()
                .context("experiment table request")?;
            self.ensure_ok(resp, "experiment table", None)?
                .text()
                .context("read experiment table body")
        })?;
        let table = parse_experiment_table(&html).context("parse experiment table")?;
        Ok(table)
    }

    pub fn all_tags(&self) -> Result<Vec<String>> {
        with_retries("load tags", || {
            tracing::debug!("GET /alltags");
            let resp = self
                .client
                .get(self.url("/alltags"))
                .send()
                .context("all tags request")?;
            let tags: Vec<String> = self
                .ensure_ok(resp, "all tags", None)?
                .json()
                .context("parse tag list")?;
            Ok(tags)
        })
    }
}
