/*
[INPUT]:  Facade call arguments
[OUTPUT]: Sidecar request bodies ({ args, credentials }) and positional argument records
[POS]:    Data layer - type definitions for sidecar communication
[UPDATE]: When sidecar method parameters change
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{CandleInterval, OrderType, Side};

/// Body of every `POST /api/{venue}/{method}` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidecarRequest {
    pub args: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<CredentialsPayload>,
}

impl SidecarRequest {
    pub fn new(args: Vec<Value>) -> Self {
        Self {
            args,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<CredentialsPayload>) -> Self {
        self.credentials = credentials;
        self
    }
}

/// How Polymarket orders are signed on behalf of the funder.
///
/// Serializes by name; deserializes from the name or the numeric code (0, 1, 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", try_from = "SignatureTypeRepr")]
pub enum SignatureType {
    Eoa,
    PolyProxy,
    GnosisSafe,
}

impl SignatureType {
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::Eoa),
            1 => Some(Self::PolyProxy),
            2 => Some(Self::GnosisSafe),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Eoa => 0,
            Self::PolyProxy => 1,
            Self::GnosisSafe => 2,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignatureTypeRepr {
    Code(u64),
    Name(String),
}

impl TryFrom<SignatureTypeRepr> for SignatureType {
    type Error = String;

    fn try_from(repr: SignatureTypeRepr) -> Result<Self, Self::Error> {
        match repr {
            SignatureTypeRepr::Code(code) => Self::from_code(code)
                .ok_or_else(|| format!("unknown signature type code {code}")),
            SignatureTypeRepr::Name(name) => match name.as_str() {
                "eoa" => Ok(Self::Eoa),
                "poly-proxy" => Ok(Self::PolyProxy),
                "gnosis-safe" => Ok(Self::GnosisSafe),
                other => other
                    .parse::<u64>()
                    .ok()
                    .and_then(Self::from_code)
                    .ok_or_else(|| format!("unknown signature type {other:?}")),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funder_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<SignatureType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketSort {
    Volume,
    Liquidity,
    Newest,
}

/// Which text fields the sidecar searches server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteSearchIn {
    Title,
    Description,
    Both,
}

/// Parameters for `fetchMarkets` / `fetchEvents`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<MarketSort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_in: Option<RemoteSearchIn>,
}

impl MarketSearchParams {
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Parameters for `fetchOHLCV`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<CandleInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Parameters for `fetchTrades`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TradeParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Unix milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<i64>,
}

/// Parameters for `createOrder`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderParams {
    pub market_id: String,
    pub outcome_id: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Required for limit orders, in [0, 1].
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    /// Fee rate in basis-point thousandths (1000 = 0.1%).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[rstest]
    #[case(json!("eoa"), SignatureType::Eoa)]
    #[case(json!(0), SignatureType::Eoa)]
    #[case(json!("poly-proxy"), SignatureType::PolyProxy)]
    #[case(json!(1), SignatureType::PolyProxy)]
    #[case(json!("gnosis-safe"), SignatureType::GnosisSafe)]
    #[case(json!(2), SignatureType::GnosisSafe)]
    #[case(json!("2"), SignatureType::GnosisSafe)]
    fn signature_type_accepts_name_or_code(#[case] raw: Value, #[case] expected: SignatureType) {
        let parsed: SignatureType = serde_json::from_value(raw).expect("signature type");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn signature_type_serializes_by_name() {
        assert_eq!(
            serde_json::to_value(SignatureType::from_code(1)).expect("encode"),
            json!("poly-proxy")
        );
        assert_eq!(SignatureType::GnosisSafe.code(), 2);
    }

    #[test]
    fn signature_type_rejects_unknown_values() {
        assert!(serde_json::from_value::<SignatureType>(json!(3)).is_err());
        assert!(serde_json::from_value::<SignatureType>(json!("multisig")).is_err());
    }

    #[test]
    fn empty_search_params_serialize_to_empty_object() {
        let params = MarketSearchParams::default();
        assert!(params.is_empty());
        assert_eq!(serde_json::to_value(&params).expect("encode"), json!({}));
    }

    #[test]
    fn create_order_params_use_wire_names() {
        let params = CreateOrderParams {
            market_id: "663583".to_string(),
            outcome_id: "10991849".to_string(),
            side: Side::Buy,
            order_type: OrderType::Limit,
            amount: dec!(10),
            price: Some(dec!(0.55)),
            fee: None,
        };

        let encoded = serde_json::to_value(&params).expect("encode");

        assert_eq!(
            encoded,
            json!({
                "marketId": "663583",
                "outcomeId": "10991849",
                "side": "buy",
                "type": "limit",
                "amount": 10.0,
                "price": 0.55
            })
        );
    }

    #[test]
    fn request_omits_missing_credentials() {
        let request = SidecarRequest::new(vec![json!("tok")]);
        assert_eq!(
            serde_json::to_value(&request).expect("encode"),
            json!({ "args": ["tok"] })
        );

        let request = request.with_credentials(Some(CredentialsPayload {
            api_key: None,
            private_key: Some("0xabc".to_string()),
            funder_address: None,
            signature_type: Some(SignatureType::GnosisSafe),
        }));
        assert_eq!(
            serde_json::to_value(&request).expect("encode"),
            json!({
                "args": ["tok"],
                "credentials": { "privateKey": "0xabc", "signatureType": "gnosis-safe" }
            })
        );
    }
}
