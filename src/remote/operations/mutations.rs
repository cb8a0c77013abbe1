use super::*;

impl RemoteClient {
    pub(super) fn post_tags(&self, route: &str, id: &ExperimentId, tags: &TagList) -> Result<()> {
        let path = format!("{}/{}", route, path_segment(id));
        tracing::debug!(%id, tags = %tags.joined(), "POST {}", route);
        let resp = self
            .client
            .post(self.url(&path))
            .json(tags)
            .send()
            .with_context(|| format!("{} request", route))?;
        self.ensure_ok(resp, route, Some(id))?;
        Ok(())
    }

    pub fn delete_experiment(&self, id: &ExperimentId) -> Result<()> {
        tracing::debug!(%id, "DELETE /experiment");
        let resp = self
            .client
            .delete(self.url(&format!("/experiment/{}", path_segment(id))))
            .send()
            .context("delete experiment request")?;
        self.ensure_ok(resp, "delete experiment", Some(id))?;
        Ok(())
    }

    pub fn delete_files(&self, id: &ExperimentId) -> Result<()> {
        tracing::debug!(%id, "GET /deletefiles");
        let resp = self
            .client
            .get(self.url(&format!("/deletefiles/{}", path_segment(id))))
            .send()
            .context("delete files request")?;
        self.ensure_ok(resp, "delete files", Some(id))?;
        Ok(())
    }

    pub fn restore_source_code(&self, id: &ExperimentId) -> Result<()> {
        tracing::debug!(%id, "GET /restore-source-code");
        let resp = self
            .client
            .get(self.url(&format!("/restore-source-code/{}", path_segment(id))))
            .send()
            .context("restore source code request")?;
        self.ensure_ok(resp, "restore source code", Some(id))?;
        Ok(())
    }

    pub fn save_text(&self, id: &ExperimentId, field: TextField, text: &str) -> Result<()> {
        tracing::debug!(%id, field = field.as_str(), "POST /save-text");
        let resp = self
            .client
            .post(self.url(&format!(
                "/save-text/{}/{}",
                path_segment(id),
                field.as_str()
            )))
            .json(&text)
            .send()
            .context("save text request")?;
        self.ensure_ok(resp, "save text", Some(id))?;
        Ok(())
    }
}
