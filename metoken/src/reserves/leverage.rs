use soroban_sdk::{
    auth::{ContractContext, InvokerContractAuthEntry, SubContractInvocation},
    vec, ConversionError, Env, Error, IntoVal, InvokeError, String, Symbol, Val, Vec,
};

use crate::{
    dependencies::{LeverageClient, TokenSettings, INSUFFICIENT_LIQUIDITY, MAX_SUPPLY_REACHED},
    errors::MeTokenError,
    storage::{self, Coin},
};

/// A failed call to the leverage contract
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeverageFailure {
    /// The leverage contract is full or illiquid. The caller can proceed without it.
    Recoverable,
    /// The leverage contract is broken or rejected the request
    Fatal,
}

impl From<LeverageFailure> for MeTokenError {
    fn from(_: LeverageFailure) -> Self {
        MeTokenError::LeverageFailure
    }
}

type TryResult<T, E = ConversionError> = Result<Result<T, E>, Result<Error, InvokeError>>;

fn classify<T, E>(result: TryResult<T, E>) -> Result<T, LeverageFailure> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(error))
            if error == Error::from_contract_error(MAX_SUPPLY_REACHED)
                || error == Error::from_contract_error(INSUFFICIENT_LIQUIDITY) =>
        {
            Err(LeverageFailure::Recoverable)
        }
        _ => Err(LeverageFailure::Fatal),
    }
}

/// Fetch the registry entry of a token from the leverage contract
pub fn token_settings(e: &Env, denom: &String) -> Result<TokenSettings, LeverageFailure> {
    let leverage = LeverageClient::new(e, &storage::get_leverage(e));
    classify(leverage.try_token_settings(denom))
}

/// Supply up to `amount` of `denom` held by the engine to the leverage contract. Returns the
/// amount supplied.
///
/// The amount is capped by the room left under the token's max supply. A request that is
/// capped to nothing is recoverable.
pub fn supply(e: &Env, denom: &String, amount: i128) -> Result<i128, LeverageFailure> {
    if amount <= 0 {
        return Ok(0);
    }
    let leverage_address = storage::get_leverage(e);
    let leverage = LeverageClient::new(e, &leverage_address);

    let settings = classify(leverage.try_token_settings(denom))?;
    let mut amount = amount;
    if settings.max_supply > 0 {
        let total_supply = classify(leverage.try_total_supply(denom))?;
        let room = settings.max_supply - total_supply;
        if room <= 0 {
            return Err(LeverageFailure::Recoverable);
        }
        amount = amount.min(room);
    }

    // the leverage contract pulls the coins from the engine through the bank
    let engine = e.current_contract_address();
    let args: Vec<Val> = vec![
        e,
        (&engine).into_val(e),
        (&leverage_address).into_val(e),
        denom.into_val(e),
        (&amount).into_val(e),
    ];
    e.authorize_as_current_contract(vec![
        e,
        InvokerContractAuthEntry::Contract(SubContractInvocation {
            context: ContractContext {
                contract: storage::get_bank(e),
                fn_name: Symbol::new(e, "send"),
                args,
            },
            sub_invocations: vec![e],
        }),
    ]);
    classify(leverage.try_supply(&engine, denom, &amount))
}

/// Withdraw up to `amount` of `denom` from the leverage contract to the engine. Returns the
/// amount withdrawn, which can be less than requested.
///
/// The amount is capped by the engine's current max withdraw. A request that is capped to
/// nothing is recoverable.
pub fn withdraw(e: &Env, denom: &String, amount: i128) -> Result<i128, LeverageFailure> {
    if amount <= 0 {
        return Ok(0);
    }
    let leverage = LeverageClient::new(e, &storage::get_leverage(e));
    let engine = e.current_contract_address();

    let max_withdraw = classify(leverage.try_max_withdraw(&engine, denom))?;
    let amount = amount.min(max_withdraw);
    if amount <= 0 {
        return Err(LeverageFailure::Recoverable);
    }
    classify(leverage.try_withdraw(&engine, denom, &amount))
}

/// Fetch everything the engine has supplied to the leverage contract, including interest
pub fn supplied(e: &Env) -> Result<Vec<Coin>, LeverageFailure> {
    let leverage = LeverageClient::new(e, &storage::get_leverage(e));
    classify(leverage.try_supplied(&e.current_contract_address()))
}

#[cfg(test)]
mod tests {
    use crate::testutils::{self, USDT};

    use super::*;
    use soroban_sdk::{testutils::Address as _, Address};

    #[test]
    fn test_supply_and_withdraw() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let usdt = String::from_str(&e, USDT);
        collaborators.bank.mint(&engine, &usdt, &1_000_000000);

        e.as_contract(&engine, || {
            assert_eq!(supply(&e, &usdt, 400_000000), Ok(400_000000));
            assert_eq!(supply(&e, &usdt, 0), Ok(0));
            assert_eq!(withdraw(&e, &usdt, 150_000000), Ok(150_000000));
            // capped by the engine's position
            assert_eq!(withdraw(&e, &usdt, 500_000000), Ok(250_000000));
            assert_eq!(withdraw(&e, &usdt, 1), Err(LeverageFailure::Recoverable));
        });
        assert_eq!(collaborators.bank.balance(&engine, &usdt), 1_000_000000);
    }

    #[test]
    fn test_supply_capped_by_max_supply() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let usdt = String::from_str(&e, USDT);
        testutils::set_leverage_max_supply(&e, &collaborators, USDT, 300_000000);
        collaborators.bank.mint(&engine, &usdt, &1_000_000000);

        e.as_contract(&engine, || {
            assert_eq!(supply(&e, &usdt, 400_000000), Ok(300_000000));
            assert_eq!(supply(&e, &usdt, 1), Err(LeverageFailure::Recoverable));
        });
        assert_eq!(collaborators.leverage.total_supply(&usdt), 300_000000);
    }

    #[test]
    fn test_withdraw_partial() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let usdt = String::from_str(&e, USDT);
        collaborators.bank.mint(&engine, &usdt, &100_000000);
        collaborators.leverage.set_withdraw_ratio(&4_000);

        e.as_contract(&engine, || {
            supply(&e, &usdt, 100_000000).unwrap();
            assert_eq!(withdraw(&e, &usdt, 50_000000), Ok(20_000000));
        });
    }

    #[test]
    fn test_classify_errors() {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let (engine, collaborators) = testutils::setup_engine(&e);
        let usdt = String::from_str(&e, USDT);
        collaborators.bank.mint(&engine, &usdt, &100_000000);

        e.as_contract(&engine, || {
            assert_eq!(
                token_settings(&e, &String::from_str(&e, "DAI")),
                Err(LeverageFailure::Fatal)
            );
        });

        collaborators.leverage.set_error(&INSUFFICIENT_LIQUIDITY);
        e.as_contract(&engine, || {
            assert_eq!(
                supply(&e, &usdt, 10_000000),
                Err(LeverageFailure::Recoverable)
            );
        });

        collaborators.leverage.set_error(&7);
        e.as_contract(&engine, || {
            assert_eq!(supply(&e, &usdt, 10_000000), Err(LeverageFailure::Fatal));
        });

        collaborators.leverage.set_error(&0);
        e.as_contract(&engine, || {
            assert_eq!(supply(&e, &usdt, 10_000000), Ok(10_000000));
            let coins = supplied(&e).unwrap();
            assert_eq!(coins.len(), 1);
            assert_eq!(coins.get_unchecked(0).amount, 10_000000);
        });
        assert_eq!(
            collaborators
                .leverage
                .max_withdraw(&Address::generate(&e), &usdt),
            0
        );
    }
}
