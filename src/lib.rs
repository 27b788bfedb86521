mod adapter;
mod api;
mod catalog;
mod client;
mod config;
mod errors;
mod events;
mod formatter;
mod models;
mod queue;
mod rest;
mod serde_helpers;
mod store;
mod stream;
mod util;

pub mod prelude {

    pub use crate::adapter::*;
    pub use crate::api::*;
    pub use crate::catalog::*;
    pub use crate::client::*;
    pub use crate::config::*;
    pub use crate::errors::*;
    pub use crate::events::*;
    pub use crate::formatter::*;
    pub use crate::models::*;
    pub use crate::queue::*;
    pub use crate::rest::*;
    pub use crate::serde_helpers::*;
    pub use crate::store::*;
    pub use crate::stream::*;
    pub use crate::util::*;

    pub(crate) use futures::{SinkExt, StreamExt};
    pub(crate) use hex::encode as hex_encode;
    pub(crate) use hmac::{Hmac, Mac};
    pub(crate) use log::{error, info, trace, warn};
    pub(crate) use reqwest::{
        header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT},
        Client as ReqwestClient, Response as ReqwestResponse, StatusCode,
    };
    pub(crate) use serde::de::DeserializeOwned;
    pub(crate) use serde::{Deserialize, Deserializer, Serializer};
    pub(crate) use serde_json::{json, Value};
    pub(crate) use sha2::Sha256;
    pub(crate) use std::str::FromStr;
    pub(crate) use thiserror::Error;
    pub(crate) use tokio::net::TcpStream;
    pub(crate) use tokio_tungstenite::WebSocketStream;
    pub(crate) use tokio_tungstenite::{
        connect_async, tungstenite::Message as WsMessage, MaybeTlsStream,
    };
}

pub use prelude::*;
