//! Validate a query without executing it

use sdp_common::query::{DataSetQueryRequest, QueryError};

/// Return the request with defaults applied if it is valid
pub fn handle(request: DataSetQueryRequest) -> Result<DataSetQueryRequest, QueryError> {
    request.validated()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_applied() {
        let request: DataSetQueryRequest = serde_json::from_str(r#"{"debug": true}"#).unwrap();
        let request = handle(request).unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 1000);
        assert!(request.debug);
    }

    #[test]
    fn test_findings_are_returned() {
        let request: DataSetQueryRequest =
            serde_json::from_str(r#"{"criteria": {"and": []}, "pageSize": 0}"#).unwrap();
        let err = handle(request).unwrap_err();
        assert_eq!(err.findings().unwrap().paths(), vec!["Criteria.And", "PageSize"]);
    }
}
