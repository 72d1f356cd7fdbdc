use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use quiz_core::model::{AttemptReport, Test, TestDraft, TestId, TestResults};

use crate::api::{
    AttemptSubmission, GatewayError, ResultsGateway, SubmitRequestDto, SubmitResponseDto, TestDto,
    TestGateway, TestResultsDto,
};

/// Header carrying the CSRF token on every mutating request.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP adapter for the quiz server.
///
/// Requests are fired as-is: no retries and no in-flight de-duplication, the
/// same contract the views are written against.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base: Url,
    csrf_token: String,
}

impl HttpGateway {
    #[must_use]
    pub fn new(base: Url, csrf_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
            csrf_token,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base
            .join(path)
            .map_err(|err| GatewayError::Connection(err.to_string()))
    }

    fn check_status(status: StatusCode) -> Result<(), GatewayError> {
        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound);
        }
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl TestGateway for HttpGateway {
    async fn fetch_test(&self, id: TestId) -> Result<Test, GatewayError> {
        let url = self.endpoint(&format!("student/test/{id}/start/"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| GatewayError::Connection(err.to_string()))?;
        Self::check_status(response.status())?;
        let dto: TestDto = response
            .json()
            .await
            .map_err(|err| GatewayError::Serialization(err.to_string()))?;
        Ok(dto.into_test())
    }

    async fn submit_attempt(
        &self,
        id: TestId,
        submission: &AttemptSubmission,
    ) -> Result<AttemptReport, GatewayError> {
        let url = self.endpoint(&format!("student/test/{id}/submit/"))?;
        let body = SubmitRequestDto::from_submission(submission);
        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER, &self.csrf_token)
            .json(&body)
            .send()
            .await
            .map_err(|err| GatewayError::Connection(err.to_string()))?;
        Self::check_status(response.status())?;
        let dto: SubmitResponseDto = response
            .json()
            .await
            .map_err(|err| GatewayError::Serialization(err.to_string()))?;
        Ok(dto.into_report())
    }

    async fn create_test(&self, draft: &TestDraft) -> Result<(), GatewayError> {
        let url = self.endpoint("teacher/test/create/")?;
        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER, &self.csrf_token)
            .form(&draft.form_fields())
            .send()
            .await
            .map_err(|err| GatewayError::Connection(err.to_string()))?;
        Self::check_status(response.status())
    }
}

#[async_trait]
impl ResultsGateway for HttpGateway {
    async fn fetch_results(&self, id: TestId) -> Result<TestResults, GatewayError> {
        let url = self.endpoint(&format!("teacher/test/{id}/results/"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| GatewayError::Connection(err.to_string()))?;
        Self::check_status(response.status())?;
        let dto: TestResultsDto = response
            .json()
            .await
            .map_err(|err| GatewayError::Serialization(err.to_string()))?;
        Ok(dto.into_results())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_against_the_base() {
        let gateway = HttpGateway::new(
            Url::parse("http://quiz.local/").unwrap(),
            "token".to_string(),
        );
        let url = gateway
            .endpoint(&format!("student/test/{}/start/", TestId::new(7)))
            .unwrap();
        assert_eq!(url.as_str(), "http://quiz.local/student/test/7/start/");
    }

    #[test]
    fn non_success_statuses_map_to_errors() {
        assert!(matches!(
            HttpGateway::check_status(StatusCode::NOT_FOUND),
            Err(GatewayError::NotFound)
        ));
        assert!(matches!(
            HttpGateway::check_status(StatusCode::INTERNAL_SERVER_ERROR),
            Err(GatewayError::Status(500))
        ));
        assert!(HttpGateway::check_status(StatusCode::OK).is_ok());
    }
}
