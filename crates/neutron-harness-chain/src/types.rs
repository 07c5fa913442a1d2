//! Wire types for the REST endpoints and contract queries the harness uses
//!
//! Cosmos SDK REST responses encode 64-bit integers as JSON strings while
//! CosmWasm contracts usually emit plain numbers; `string_number` accepts both.

use serde::{Deserialize, Serialize};

/// `GET /cosmos/base/tendermint/v1beta1/blocks/latest`
#[derive(Debug, Clone, Deserialize)]
pub struct LatestBlockResponse {
    pub block: Block,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockHeader {
    #[serde(default)]
    pub chain_id: String,
    #[serde(with = "string_number")]
    pub height: u64,
}

/// IBC height of the remote chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Height {
    #[serde(default, with = "string_number")]
    pub revision_number: u64,
    #[serde(default, with = "string_number")]
    pub revision_height: u64,
}

/// `GET /neutron/interchainqueries/registered_query`
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredQueryResponse {
    pub registered_query: RegisteredQuery,
}

/// An interchain query registered with the `interchainqueries` module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredQuery {
    #[serde(with = "string_number")]
    pub id: u64,
    pub owner: String,
    pub query_type: String,
    #[serde(default)]
    pub keys: Vec<KvKey>,
    #[serde(default)]
    pub transactions_filter: String,
    pub connection_id: String,
    #[serde(with = "string_number")]
    pub update_period: u64,
    #[serde(default, with = "string_number")]
    pub last_submitted_result_local_height: u64,
    #[serde(default)]
    pub last_submitted_result_remote_height: Height,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvKey {
    pub path: String,
    pub key: String,
}

/// Envelope of `GET /cosmwasm/wasm/v1/contract/{addr}/smart/{query}`
#[derive(Debug, Clone, Deserialize)]
pub struct SmartQueryResponse<R> {
    pub data: R,
}

/// `GET /cosmos/bank/v1beta1/balances/{addr}/by_denom`
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub balance: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    #[serde(with = "string_number")]
    pub amount: u128,
}

/// Queries understood by the interchain test contracts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestContractQuery<'a> {
    /// Number of incoming transfers the contract has recorded
    GetTransfersNumber {},
    /// Acknowledgement stored for an interchain transaction
    AcknowledgementResult {
        interchain_account_id: &'a str,
        sequence_id: u64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransfersNumberResponse {
    #[serde(with = "string_number")]
    pub transfers_number: u64,
}

/// Outcome of an interchain transaction as recorded by the contract's sudo handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcknowledgementResult {
    /// Message type URLs of the successfully executed messages
    Success(Vec<String>),
    /// Failing message type and error
    Error((String, String)),
    /// Message type of the timed out message
    Timeout(String),
}

impl AcknowledgementResult {
    pub fn is_success(&self) -> bool {
        matches!(self, AcknowledgementResult::Success(_))
    }
}

/// Cosmos integers arrive as JSON strings, occasionally as plain numbers
///
/// Numbers are only exact up to `u64::MAX`: serde_json reads larger numbers as
/// floats, which are rejected instead of being rounded. Large amounts must be
/// strings, as the LCD sends them.
pub(crate) mod string_number {
    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::Serializer;
    use std::fmt::{self, Display};
    use std::marker::PhantomData;
    use std::str::FromStr;

    struct NumberVisitor<T>(PhantomData<T>);

    impl<'de, T> Visitor<'de> for NumberVisitor<T>
    where
        T: FromStr + TryFrom<u64> + TryFrom<u128>,
        <T as FromStr>::Err: Display,
    {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an unsigned integer or a string holding one")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
            <T as TryFrom<u64>>::try_from(v)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<T, E> {
            <T as TryFrom<u128>>::try_from(v)
                .map_err(|_| E::custom(format!("integer {} out of range", v)))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
            match u64::try_from(v) {
                Ok(v) => self.visit_u64(v),
                Err(_) => Err(E::invalid_value(Unexpected::Signed(v), &self)),
            }
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
            Err(E::custom(format!(
                "{} is not an exact integer, integers above u64::MAX must be sent as strings",
                v
            )))
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr + TryFrom<u64> + TryFrom<u128>,
        <T as FromStr>::Err: Display,
    {
        deserializer.deserialize_any(NumberVisitor(PhantomData))
    }

    pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        serializer.collect_str(value)
    }
}
