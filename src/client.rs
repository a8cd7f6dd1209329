use std::sync::Arc;

use tracing::debug;

use crate::config::{ProviderKind, SdkConfig};
use crate::error::SdkError;
use crate::http::DynHttpTransport;
use crate::http::reqwest::default_dyn_transport;
use crate::provider::{
    DexScreenerProvider, DynMarketDataProvider, DynPairDataProvider, DynSocialSearchProvider,
    DynWeatherProvider, LunarCrushProvider, OpenWeatherProvider, TwitterProvider,
};
use crate::researcher::{GenericResearcher, TokenResearcher};

/// Entry point holding the agent configuration and every research facade.
pub struct WaifuSdk {
    config: Arc<SdkConfig>,
    token: TokenResearcher,
    generic: GenericResearcher,
}

impl WaifuSdk {
    /// Builds all facades over the default reqwest transport.
    pub fn new(config: SdkConfig) -> Result<Self, SdkError> {
        Self::builder(config).build()
    }

    /// Builds all facades over `transport`.
    pub fn with_transport(config: SdkConfig, transport: DynHttpTransport) -> Self {
        let config = Arc::new(config);
        Self {
            token: TokenResearcher::from_config(&config, transport.clone()),
            generic: GenericResearcher::from_config(&config, transport),
            config,
        }
    }

    pub fn builder(config: SdkConfig) -> WaifuSdkBuilder {
        WaifuSdkBuilder {
            config,
            transport: None,
            pairs: None,
            market: None,
            social: None,
            weather: None,
        }
    }

    pub fn token(&self) -> &TokenResearcher {
        &self.token
    }

    pub fn generic(&self) -> &GenericResearcher {
        &self.generic
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn agent_id(&self) -> &str {
        &self.config.agent_id
    }
}

/// Overrides the transport or individual providers before the facades are wired.
///
/// Providers that are not supplied fall back to the bundled clients over the chosen
/// transport. The default transport is only created when some bundled client needs it.
pub struct WaifuSdkBuilder {
    config: SdkConfig,
    transport: Option<DynHttpTransport>,
    pairs: Option<DynPairDataProvider>,
    market: Option<DynMarketDataProvider>,
    social: Option<DynSocialSearchProvider>,
    weather: Option<DynWeatherProvider>,
}

impl WaifuSdkBuilder {
    pub fn with_transport(mut self, transport: DynHttpTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_pair_data_provider(mut self, provider: DynPairDataProvider) -> Self {
        self.pairs = Some(provider);
        self
    }

    pub fn with_market_data_provider(mut self, provider: DynMarketDataProvider) -> Self {
        self.market = Some(provider);
        self
    }

    pub fn with_social_search_provider(mut self, provider: DynSocialSearchProvider) -> Self {
        self.social = Some(provider);
        self
    }

    pub fn with_weather_provider(mut self, provider: DynWeatherProvider) -> Self {
        self.weather = Some(provider);
        self
    }

    pub fn build(self) -> Result<WaifuSdk, SdkError> {
        let needs_transport = self.pairs.is_none()
            || self.market.is_none()
            || self.social.is_none()
            || self.weather.is_none();
        let transport = match self.transport {
            Some(transport) => Some(transport),
            None if needs_transport => Some(default_dyn_transport()?),
            None => None,
        };

        let config = Arc::new(self.config);
        let pairs = resolve(self.pairs, &transport, |transport| {
            Arc::new(DexScreenerProvider::new(transport)) as DynPairDataProvider
        })?;
        let market = resolve(self.market, &transport, |transport| {
            Arc::new(LunarCrushProvider::new(
                transport,
                config.api_key(ProviderKind::LunarCrush),
            )) as DynMarketDataProvider
        })?;
        let social = resolve(self.social, &transport, |transport| {
            Arc::new(TwitterProvider::new(
                transport,
                config.api_key(ProviderKind::Twitter),
            )) as DynSocialSearchProvider
        })?;
        let weather = resolve(self.weather, &transport, |transport| {
            Arc::new(OpenWeatherProvider::new(
                transport,
                config.api_key(ProviderKind::Weather),
            )) as DynWeatherProvider
        })?;

        debug!(agent_id = %config.agent_id, "sdk initialized");
        Ok(WaifuSdk {
            token: TokenResearcher::new(pairs, market, social),
            generic: GenericResearcher::new(weather),
            config,
        })
    }
}

fn resolve<T: ?Sized>(
    injected: Option<Arc<T>>,
    transport: &Option<DynHttpTransport>,
    bundled: impl FnOnce(DynHttpTransport) -> Arc<T>,
) -> Result<Arc<T>, SdkError> {
    match (injected, transport) {
        (Some(provider), _) => Ok(provider),
        (None, Some(transport)) => Ok(bundled(transport.clone())),
        (None, None) => Err(SdkError::transport("no HTTP transport available")),
    }
}
