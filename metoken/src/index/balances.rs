use soroban_sdk::{vec, Env, String};

use crate::{
    errors::MeTokenError,
    storage::{AssetBalance, Index, IndexBalances},
    validator::require_metoken_denom,
};

impl AssetBalance {
    /// Create an empty balance for an asset
    pub fn zero(denom: &String) -> Self {
        AssetBalance {
            denom: denom.clone(),
            leveraged: 0,
            reserved: 0,
            fees: 0,
            interest: 0,
        }
    }

    /// The amount backing the outstanding meTokens, excluding fees and interest
    pub fn available_supply(&self) -> i128 {
        self.reserved + self.leveraged
    }

    /// Validate that no amount is negative
    pub fn validate(&self) -> Result<(), MeTokenError> {
        if self.leveraged < 0 || self.reserved < 0 || self.fees < 0 || self.interest < 0 {
            return Err(MeTokenError::BalanceError);
        }
        Ok(())
    }
}

impl IndexBalances {
    /// Create empty balances for every asset accepted by an index
    pub fn new(e: &Env, index: &Index) -> Self {
        let mut asset_balances = vec![e];
        for asset in index.accepted_assets.iter() {
            asset_balances.push_back(AssetBalance::zero(&asset.denom));
        }
        IndexBalances {
            denom: index.denom.clone(),
            metoken_supply: 0,
            asset_balances,
        }
    }

    /// Fetch the balance of an asset
    pub fn asset_balance(&self, denom: &String) -> Option<AssetBalance> {
        self.asset_balances
            .iter()
            .find(|balance| balance.denom == *denom)
    }

    /// Replace the balance with the same denom, or append it if the asset has no balance yet
    pub fn set_asset_balance(&mut self, balance: AssetBalance) {
        let position = self
            .asset_balances
            .iter()
            .position(|existing| existing.denom == balance.denom);
        match position {
            Some(i) => self.asset_balances.set(i as u32, balance),
            None => self.asset_balances.push_back(balance),
        }
    }

    /// Validate that the supply and every asset balance are non-negative, and that no asset
    /// has two balances
    pub fn validate(&self) -> Result<(), MeTokenError> {
        require_metoken_denom(&self.denom)?;
        if self.metoken_supply < 0 {
            return Err(MeTokenError::BalanceError);
        }
        for (i, balance) in self.asset_balances.iter().enumerate() {
            if self
                .asset_balances
                .iter()
                .take(i)
                .any(|earlier| earlier.denom == balance.denom)
            {
                return Err(MeTokenError::InvalidRequest);
            }
            balance.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::testutils::{self, IST, USDT};

    use super::*;

    #[test]
    fn test_new_balances() {
        let e = Env::default();

        let index = testutils::usd_index(&e);
        let balances = IndexBalances::new(&e, &index);
        assert_eq!(balances.denom, index.denom);
        assert_eq!(balances.metoken_supply, 0);
        assert_eq!(balances.asset_balances.len(), 3);
        for (asset, balance) in index
            .accepted_assets
            .iter()
            .zip(balances.asset_balances.iter())
        {
            assert_eq!(balance, AssetBalance::zero(&asset.denom));
        }
    }

    #[test]
    fn test_set_asset_balance() {
        let e = Env::default();

        let index = testutils::usd_index(&e);
        let mut balances = IndexBalances::new(&e, &index);
        let ist = String::from_str(&e, IST);

        let mut balance = balances.asset_balance(&ist).unwrap();
        balance.reserved = 600;
        balance.leveraged = 2400;
        balances.set_asset_balance(balance);
        let balance = balances.asset_balance(&ist).unwrap();
        assert_eq!(balance.available_supply(), 3000);
        assert_eq!(balances.asset_balances.len(), 3);

        let dai = String::from_str(&e, "DAI");
        balances.set_asset_balance(AssetBalance::zero(&dai));
        assert_eq!(balances.asset_balances.len(), 4);
        assert_eq!(balances.asset_balances.get_unchecked(3).denom, dai);
    }

    #[test]
    fn test_validate_balances() {
        let e = Env::default();

        let index = testutils::usd_index(&e);
        let mut balances = IndexBalances::new(&e, &index);
        assert_eq!(balances.validate(), Ok(()));

        let mut balance = AssetBalance::zero(&String::from_str(&e, USDT));
        balance.fees = -1;
        balances.set_asset_balance(balance);
        assert_eq!(balances.validate(), Err(MeTokenError::BalanceError));

        let mut balances = IndexBalances::new(&e, &index);
        balances.metoken_supply = -1;
        assert_eq!(balances.validate(), Err(MeTokenError::BalanceError));

        let mut balances = IndexBalances::new(&e, &index);
        balances
            .asset_balances
            .push_back(AssetBalance::zero(&String::from_str(&e, IST)));
        assert_eq!(balances.validate(), Err(MeTokenError::InvalidRequest));

        let mut balances = IndexBalances::new(&e, &index);
        balances.denom = String::from_str(&e, USDT);
        assert_eq!(balances.validate(), Err(MeTokenError::InvalidRequest));
    }
}
