use super::*;

impl RemoteClient {
    pub fn compare_with_local(&self, id: &ExperimentId) -> Result<ComparisonResult> {
        with_retries("compare with local", || {
            tracing::debug!(%id, "GET /compare-with-local");
            let resp = self
                .client
                .get(self.url(&format!("/compare-with-local/{}", path_segment(id))))
                .send()
                .context("compare with local request")?;
            let result: ComparisonResult = self
                .ensure_ok(resp, "compare with local", Some(id))?
                .json()
                .context("parse comparison")?;
            Ok(result)
        })
    }

    pub fn compare_experiments(
        &self,
        left: &ExperimentId,
        right: &ExperimentId,
    ) -> Result<ComparisonResult> {
        let body = [left, right];
        with_retries("compare experiments", || {
            tracing::debug!(%left, %right, "POST /compare-experiments");
            let resp = self
                .client
                .post(self.url("/compare-experiments"))
                .json(&body)
                .send()
                .context("compare experiments request")?;
            let result: ComparisonResult = self
                .ensure_ok(resp, "compare experiments", None)?
                .json()
                .context("parse comparison")?;
            Ok(result)
        })
    }

    pub fn experiment_detail(&self, id: &ExperimentId) -> Result<String> {
        with_retries("load experiment", || {
            tracing::debug!(%id, "GET /experiment");
            let resp = self
                .client
                .get(self.url(&format!("/experiment/{}", path_segment(id))))
                .send()
                .context("experiment request")?;
            self.ensure_ok(resp, "experiment", Some(id))?
                .text()
                .context("read experiment body")
        })
    }
}
