/// One non-margin asset held in the futures wallet, alongside its USD
/// valuation (see the adapter's asset conversion rule).
#[derive(Clone, Debug, PartialEq)]
pub struct AssetBalance {
    pub symbol: String,
    pub wallet_balance: f64,
    pub usd_value: f64,
}

/// Account-wide balance snapshot. `total` must equal the sum of every
/// asset's `usd_value` after each update.
#[derive(Clone, Debug, PartialEq)]
pub struct Balance {
    pub total: f64,
    pub free: f64,
    pub used: f64,
    pub upnl: f64,
    pub assets: Vec<AssetBalance>,
}

impl Balance {
    pub fn recompute_total(&mut self) {
        self.total = self.assets.iter().map(|a| a.usd_value).sum();
    }
}

impl Default for Balance {
    fn default() -> Self {
        Balance {
            total: 0.0,
            free: 0.0,
            used: 0.0,
            upnl: 0.0,
            assets: Vec::new(),
        }
    }
}
