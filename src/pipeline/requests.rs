//! Request descriptors for the transfer-listing and detail waves

use crate::explorer::{ExplorerApi, PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

/// One HTTP request of a fetch wave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
}

impl RequestDescriptor {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
        }
    }
}

/// `page_count` transfer-page requests for one wallet, ascending offsets 0, 20, 40, ...
pub fn page_requests(api: &ExplorerApi, address: &str, page_count: usize) -> Vec<RequestDescriptor> {
    (0..page_count)
        .map(|page| RequestDescriptor::get(api.transfers_url(address, page * PAGE_SIZE)))
        .collect()
}

/// Page requests for a whole batch of wallets, grouped per wallet in input order
pub fn batch_requests(api: &ExplorerApi, wallets: &[String], page_count: usize) -> Vec<RequestDescriptor> {
    wallets
        .iter()
        .flat_map(|address| page_requests(api, address, page_count))
        .collect()
}

pub fn detail_request(api: &ExplorerApi, transaction_id: &str) -> RequestDescriptor {
    RequestDescriptor::get(api.transaction_info_url(transaction_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> ExplorerApi {
        ExplorerApi::new("https://apilist.tronscan.org")
    }

    #[test]
    fn test_page_offsets_ascend() {
        let requests = page_requests(&api(), "TWalletA", 3);

        assert_eq!(requests.len(), 3);
        for (page, request) in requests.iter().enumerate() {
            assert_eq!(request.method, HttpMethod::Get);
            assert!(request.url.contains(&format!("start={}", page * 20)));
            assert!(request.url.contains("limit=20"));
            assert!(request.url.contains("sort=-timestamp"));
            assert!(request.url.ends_with("relatedAddress=TWalletA"));
        }
    }

    #[test]
    fn test_batch_keeps_wallet_grouping() {
        let wallets = vec!["TA".to_string(), "TB".to_string()];
        let requests = batch_requests(&api(), &wallets, 2);

        assert_eq!(requests.len(), 4);
        assert!(requests[0].url.ends_with("relatedAddress=TA") && requests[0].url.contains("start=0&"));
        assert!(requests[1].url.ends_with("relatedAddress=TA") && requests[1].url.contains("start=20&"));
        assert!(requests[2].url.ends_with("relatedAddress=TB") && requests[2].url.contains("start=0&"));
        assert!(requests[3].url.ends_with("relatedAddress=TB") && requests[3].url.contains("start=20&"));
    }

    #[test]
    fn test_detail_request() {
        let request = detail_request(&api(), "deadbeef");
        assert_eq!(
            request.url,
            "https://apilist.tronscan.org/api/transaction-info?hash=deadbeef"
        );
    }
}
