use std::sync::Arc;

use futures_util::try_join;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::{ProviderKind, SdkConfig};
use crate::error::SdkError;
use crate::http::DynHttpTransport;
use crate::provider::{
    DexScreenerProvider, DynMarketDataProvider, DynPairDataProvider, DynSocialSearchProvider,
    LunarCrushProvider, TwitterProvider,
};

/// Identifies a token on a specific chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenQuery {
    pub address: String,
    pub chain: String,
    pub symbol: String,
}

impl TokenQuery {
    pub fn new(
        address: impl Into<String>,
        chain: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            chain: chain.into(),
            symbol: symbol.into(),
        }
    }
}

/// Raw provider responses for one token, one field per source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReport {
    pub pair_data: Value,
    pub market_data: Value,
    pub social_data: Value,
    pub tweets: Value,
}

/// Collects DEX pairs, market metrics, social metrics and tweets for a token.
pub struct TokenResearcher {
    pairs: DynPairDataProvider,
    market: DynMarketDataProvider,
    social: DynSocialSearchProvider,
}

impl TokenResearcher {
    pub fn new(
        pairs: DynPairDataProvider,
        market: DynMarketDataProvider,
        social: DynSocialSearchProvider,
    ) -> Self {
        Self {
            pairs,
            market,
            social,
        }
    }

    /// Wires the bundled DexScreener, LunarCrush and Twitter clients.
    pub fn from_config(config: &SdkConfig, transport: DynHttpTransport) -> Self {
        Self::new(
            Arc::new(DexScreenerProvider::new(transport.clone())),
            Arc::new(LunarCrushProvider::new(
                transport.clone(),
                config.api_key(ProviderKind::LunarCrush),
            )),
            Arc::new(TwitterProvider::new(
                transport,
                config.api_key(ProviderKind::Twitter),
            )),
        )
    }

    /// Runs the four lookups concurrently and returns them side by side.
    ///
    /// The first failing lookup aborts the call and its error is returned as-is; the
    /// lookups still in flight are dropped.
    #[instrument(skip(self), fields(symbol = %query.symbol, chain = %query.chain))]
    pub async fn research(&self, query: &TokenQuery) -> Result<TokenReport, SdkError> {
        let (pair_data, market_data, social_data, tweets) = try_join!(
            self.pairs.token_pairs(&query.chain, &query.address),
            self.market.coin(&query.symbol),
            self.market.social_data(&query.symbol),
            self.social.search_tweets(&query.symbol),
        )?;
        debug!("token research complete");

        Ok(TokenReport {
            pair_data,
            market_data,
            social_data,
            tweets,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::provider::{MarketDataProvider, PairDataProvider, SocialSearchProvider};

    #[derive(Default)]
    struct CallLog(Mutex<Vec<String>>);

    impl CallLog {
        fn push(&self, entry: String) {
            self.0.lock().expect("lock").push(entry);
        }

        fn entries(&self) -> Vec<String> {
            let mut entries = self.0.lock().expect("lock").clone();
            entries.sort();
            entries
        }
    }

    struct FakePairs(Arc<CallLog>);

    #[async_trait]
    impl PairDataProvider for FakePairs {
        async fn token_pairs(&self, chain: &str, address: &str) -> Result<Value, SdkError> {
            self.0.push(format!("pairs:{chain}:{address}"));
            Ok(json!([{"chainId": chain, "pairAddress": "pair-1"}]))
        }
    }

    struct FakeMarket {
        log: Arc<CallLog>,
        fail_social: bool,
    }

    #[async_trait]
    impl MarketDataProvider for FakeMarket {
        async fn coin(&self, symbol: &str) -> Result<Value, SdkError> {
            self.log.push(format!("coin:{symbol}"));
            Ok(json!({"symbol": symbol, "price": 142.0}))
        }

        async fn social_data(&self, symbol: &str) -> Result<Value, SdkError> {
            self.log.push(format!("social:{symbol}"));
            if self.fail_social {
                return Err(SdkError::RateLimit {
                    message: "slow down".to_string(),
                    retry_after: Some(Duration::from_secs(5)),
                });
            }
            Ok(json!({"topic": symbol.to_lowercase(), "interactions_24h": 1000}))
        }
    }

    struct FakeSocial(Arc<CallLog>);

    #[async_trait]
    impl SocialSearchProvider for FakeSocial {
        async fn search_tweets(&self, query: &str) -> Result<Value, SdkError> {
            self.0.push(format!("tweets:{query}"));
            Ok(json!({"data": [{"id": "1", "text": "gm"}]}))
        }
    }

    fn researcher(log: &Arc<CallLog>, fail_social: bool) -> TokenResearcher {
        TokenResearcher::new(
            Arc::new(FakePairs(log.clone())),
            Arc::new(FakeMarket {
                log: log.clone(),
                fail_social,
            }),
            Arc::new(FakeSocial(log.clone())),
        )
    }

    fn sol_query() -> TokenQuery {
        TokenQuery::new(
            "D4yF6j16FitfzH6e3Q9yYXTwV1tzpy2yGkjouD5Hpump",
            "solana",
            "SOL",
        )
    }

    #[tokio::test]
    async fn research_merges_every_source() {
        let log = Arc::new(CallLog::default());
        let report = researcher(&log, false)
            .research(&sol_query())
            .await
            .expect("research should succeed");

        assert_eq!(
            report.pair_data,
            json!([{"chainId": "solana", "pairAddress": "pair-1"}])
        );
        assert_eq!(report.market_data, json!({"symbol": "SOL", "price": 142.0}));
        assert_eq!(
            report.social_data,
            json!({"topic": "sol", "interactions_24h": 1000})
        );
        assert_eq!(report.tweets, json!({"data": [{"id": "1", "text": "gm"}]}));
        assert_eq!(
            log.entries(),
            vec![
                "coin:SOL".to_string(),
                "pairs:solana:D4yF6j16FitfzH6e3Q9yYXTwV1tzpy2yGkjouD5Hpump".to_string(),
                "social:SOL".to_string(),
                "tweets:SOL".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn research_propagates_first_failure_unchanged() {
        let log = Arc::new(CallLog::default());
        let err = researcher(&log, true)
            .research(&sol_query())
            .await
            .expect_err("social failure should abort");

        match err {
            SdkError::RateLimit {
                message,
                retry_after,
            } => {
                assert_eq!(message, "slow down");
                assert_eq!(retry_after, Some(Duration::from_secs(5)));
            }
            other => panic!("unexpected error type: {other:?}"),
        }
    }

    struct NeverPairs;

    #[async_trait]
    impl PairDataProvider for NeverPairs {
        async fn token_pairs(&self, _chain: &str, _address: &str) -> Result<Value, SdkError> {
            futures_util::future::pending().await
        }
    }

    struct NeverMarket;

    #[async_trait]
    impl MarketDataProvider for NeverMarket {
        async fn coin(&self, _symbol: &str) -> Result<Value, SdkError> {
            futures_util::future::pending().await
        }

        async fn social_data(&self, _symbol: &str) -> Result<Value, SdkError> {
            futures_util::future::pending().await
        }
    }

    struct BrokenSocial;

    #[async_trait]
    impl SocialSearchProvider for BrokenSocial {
        async fn search_tweets(&self, _query: &str) -> Result<Value, SdkError> {
            Err(SdkError::transport("connection reset"))
        }
    }

    #[tokio::test]
    async fn research_fails_fast_while_other_lookups_are_still_pending() {
        let researcher = TokenResearcher::new(
            Arc::new(NeverPairs),
            Arc::new(NeverMarket),
            Arc::new(BrokenSocial),
        );

        let outcome =
            tokio::time::timeout(Duration::from_secs(2), researcher.research(&sol_query()))
                .await
                .expect("research must not wait for pending lookups");

        match outcome {
            Err(SdkError::Transport { message }) => assert_eq!(message, "connection reset"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn report_serializes_with_camel_case_fields() {
        let report = TokenReport {
            pair_data: json!([]),
            market_data: json!({}),
            social_data: Value::Null,
            tweets: json!({"data": []}),
        };
        assert_eq!(
            serde_json::to_value(&report).expect("serialize"),
            json!({"pairData": [], "marketData": {}, "socialData": null, "tweets": {"data": []}})
        );
    }
}
