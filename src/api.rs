/// Binance USDT-margined futures REST route table, one variant per
/// endpoint the adapter calls. Mirrors each route's HTTP verb in its
/// owning module rather than in the enum itself.
pub enum API {
    Market(MarketRoute),
    Trade(TradeRoute),
    Account(AccountRoute),
    UserStream(UserStreamRoute),
}

#[derive(Debug)]
pub enum WebsocketAPI {
    UserData,
}

pub enum MarketRoute {
    ExchangeInfo,
    LeverageBracket,
    Ticker24h,
    TickerBook,
    TickerPrice,
    PremiumIndex,
    Klines,
}

pub enum TradeRoute {
    Order,
    BatchOrders,
    OpenOrders,
    AllOpenOrders,
}

pub enum AccountRoute {
    Info,
    Balance,
    PositionSideDual,
    Leverage,
}

pub enum UserStreamRoute {
    ListenKey,
}

impl AsRef<str> for API {
    fn as_ref(&self) -> &str {
        match self {
            API::Market(route) => match route {
                MarketRoute::ExchangeInfo => "/fapi/v1/exchangeInfo",
                MarketRoute::LeverageBracket => "/fapi/v1/leverageBracket",
                MarketRoute::Ticker24h => "/fapi/v1/ticker/24hr",
                MarketRoute::TickerBook => "/fapi/v1/ticker/bookTicker",
                MarketRoute::TickerPrice => "/fapi/v1/ticker/price",
                MarketRoute::PremiumIndex => "/fapi/v1/premiumIndex",
                MarketRoute::Klines => "/fapi/v1/klines",
            },
            API::Trade(route) => match route {
                TradeRoute::Order => "/fapi/v1/order",
                TradeRoute::BatchOrders => "/fapi/v1/batchOrders",
                TradeRoute::OpenOrders => "/fapi/v1/openOrders",
                TradeRoute::AllOpenOrders => "/fapi/v1/allOpenOrders",
            },
            API::Account(route) => match route {
                AccountRoute::Info => "/fapi/v2/account",
                AccountRoute::Balance => "/fapi/v2/balance",
                AccountRoute::PositionSideDual => "/fapi/v1/positionSide/dual",
                AccountRoute::Leverage => "/fapi/v1/leverage",
            },
            API::UserStream(route) => match route {
                UserStreamRoute::ListenKey => "/fapi/v1/listenKey",
            },
        }
    }
}

impl From<API> for String {
    fn from(item: API) -> Self {
        String::from(item.as_ref())
    }
}

impl AsRef<str> for WebsocketAPI {
    fn as_ref(&self) -> &str {
        match self {
            WebsocketAPI::UserData => "/ws",
        }
    }
}
