use std::time::Duration;

/// Static venue endpoints plus the knobs the rest of the crate treats as
/// ambient configuration (recv window, tick cadence).
#[derive(Clone, Debug)]
pub struct Config {
    pub rest_api_endpoint: &'static str,
    pub ws_endpoint: &'static str,
    pub recv_window: u64,
    pub tick_interval: Duration,
}

impl Config {
    pub const DEFAULT_REST_API_ENDPOINT: &'static str = "https://fapi.binance.com";
    pub const DEFAULT_WS_ENDPOINT: &'static str = "wss://fstream.binance.com";
    pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 10;

    pub const fn default() -> Self {
        Self {
            rest_api_endpoint: Self::DEFAULT_REST_API_ENDPOINT,
            ws_endpoint: Self::DEFAULT_WS_ENDPOINT,
            recv_window: 5000,
            tick_interval: Duration::from_secs(Self::DEFAULT_TICK_INTERVAL_SECS),
        }
    }

    pub const fn testnet() -> Self {
        Self {
            rest_api_endpoint: "https://testnet.binancefuture.com",
            ws_endpoint: "wss://stream.binancefuture.com",
            recv_window: 5000,
            tick_interval: Duration::from_secs(Self::DEFAULT_TICK_INTERVAL_SECS),
        }
    }

    pub const fn set_recv_window(self, recv_window: u64) -> Self {
        Self {
            recv_window,
            ..self
        }
    }

    pub const fn set_tick_interval(self, tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            ..self
        }
    }
}
