//! Route table of the remote API and the response shape each route promises.

use reqwest::Method;

/// What the caller expects the payload to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// One object (or a scalar) passes through as is.
    Single,
    /// A list. A lone object is wrapped into a one-element list.
    Collection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Register,
    Login,
    ListTransactions,
    CreateTransaction,
    DeleteTransaction,
    ListBalances,
    CreateBalance,
    DeleteBalance,
    Overview,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::ListTransactions | Endpoint::ListBalances | Endpoint::Overview => Method::GET,
            Endpoint::DeleteTransaction | Endpoint::DeleteBalance => Method::DELETE,
            Endpoint::Register
            | Endpoint::Login
            | Endpoint::CreateTransaction
            | Endpoint::CreateBalance => Method::POST,
        }
    }

    fn base_path(&self) -> &'static str {
        match self {
            Endpoint::Register => "/auth/register",
            Endpoint::Login => "/auth/login",
            Endpoint::ListTransactions
            | Endpoint::CreateTransaction
            | Endpoint::DeleteTransaction => "/transactions",
            Endpoint::ListBalances | Endpoint::CreateBalance | Endpoint::DeleteBalance => {
                "/balance"
            }
            Endpoint::Overview => "/overview",
        }
    }

    /// Request path. `id` is appended as an encoded segment when given.
    pub fn path(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/{}", self.base_path(), urlencoding::encode(id)),
            None => self.base_path().to_string(),
        }
    }

    pub fn response_shape(&self) -> ResponseShape {
        match self {
            Endpoint::ListTransactions | Endpoint::ListBalances | Endpoint::CreateBalance => {
                ResponseShape::Collection
            }
            _ => ResponseShape::Single,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Register => "register",
            Endpoint::Login => "login",
            Endpoint::ListTransactions => "list_transactions",
            Endpoint::CreateTransaction => "create_transaction",
            Endpoint::DeleteTransaction => "delete_transaction",
            Endpoint::ListBalances => "list_balances",
            Endpoint::CreateBalance => "create_balance",
            Endpoint::DeleteBalance => "delete_balance",
            Endpoint::Overview => "overview",
        }
    }
}
