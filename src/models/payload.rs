use indexmap::IndexMap;

/// Flat, ordered map of venue field names to string values, ready to be
/// serialized into a signed query string. Field order is preserved because
/// Binance signs over the exact query string sent.
#[derive(Clone, Debug, PartialEq)]
pub struct PayloadOrder {
    pub client_order_id: String,
    pub fields: IndexMap<&'static str, String>,
}

impl PayloadOrder {
    pub fn new(client_order_id: String) -> Self {
        PayloadOrder {
            fields: IndexMap::new(),
            client_order_id,
        }
    }

    pub fn set(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.fields.insert(key, value.to_string());
        self
    }

    pub fn into_query_string(self) -> String {
        crate::util::build_request(&self.fields)
    }
}
