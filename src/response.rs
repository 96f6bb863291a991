use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
}

impl Meta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            total: Some(total),
            total_pages: Some(total.div_ceil(limit.max(1))),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            limit: None,
            total: None,
            total_pages: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Meta;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(Meta::new(1, 10, 0).total_pages, Some(0));
        assert_eq!(Meta::new(1, 10, 10).total_pages, Some(1));
        assert_eq!(Meta::new(2, 10, 11).total_pages, Some(2));
        assert_eq!(Meta::new(3, 7, 50).total_pages, Some(8));
    }
}
