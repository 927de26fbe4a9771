use metoken::{
    AcceptedAsset, Coin, Fee, Index, IndexBalances, MeTokenClient, MeTokenContract, Params,
    SCALAR_18,
};
use mock_bank::{MockBank, MockBankClient};
use mock_leverage::{MockLeverage, MockLeverageClient, TokenSettings};
use mock_oracle::{MockOracle, MockOracleClient};
use soroban_sdk::testutils::{Address as _, Ledger, LedgerInfo};
use soroban_sdk::{vec, Address, Env, String, Symbol};

pub const ME_USD: &str = "me/USD";

#[derive(Clone, Copy)]
#[repr(usize)]
pub enum TokenIndex {
    USDT = 0,
    USDC = 1,
    IST = 2,
}

pub struct TokenFixture {
    pub denom: &'static str,
    pub price: i128, // oracle price, 7 decimals
}

pub const TOKENS: [TokenFixture; 3] = [
    TokenFixture {
        denom: "USDT",
        price: 0_9980000,
    },
    TokenFixture {
        denom: "USDC",
        price: 1_0000000,
    },
    TokenFixture {
        denom: "IST",
        price: 1_0200000,
    },
];

pub struct TestFixture<'a> {
    pub env: Env,
    pub bombadil: Address, // admin
    pub gandalf: Address,  // emergency admin
    pub auction: Address,
    pub engine: MeTokenClient<'a>,
    pub bank: MockBankClient<'a>,
    pub leverage: MockLeverageClient<'a>,
    pub oracle: MockOracleClient<'a>,
}

impl TestFixture<'_> {
    /// Create a new TestFixture for the meToken engine
    ///
    /// Deploys the bank, leverage and oracle collaborators with USDT (0), USDC (1) and IST (2)
    /// registered, and initializes the engine with default params. No index is registered.
    pub fn create<'a>() -> TestFixture<'a> {
        let e = Env::default();
        e.mock_all_auths();
        e.budget().reset_unlimited();

        let bombadil = Address::generate(&e);
        let gandalf = Address::generate(&e);
        let auction = Address::generate(&e);

        e.ledger().set(LedgerInfo {
            timestamp: 1_700_000_000,
            protocol_version: 20,
            sequence_number: 100,
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: 500000,
            max_entry_ttl: 9999999,
        });

        // deploy collaborators
        let bank = MockBankClient::new(&e, &e.register_contract(None, MockBank {}));
        let leverage = MockLeverageClient::new(&e, &e.register_contract(None, MockLeverage {}));
        let oracle = MockOracleClient::new(&e, &e.register_contract(None, MockOracle {}));
        leverage.initialize(&bank.address);
        for token in TOKENS.iter() {
            leverage.register_token(
                &String::from_str(&e, token.denom),
                &TokenSettings {
                    symbol: Symbol::new(&e, token.denom),
                    exponent: 6,
                    max_supply: 0,
                },
            );
            oracle.set_price(&Symbol::new(&e, token.denom), &token.price);
        }

        // deploy engine
        let engine = MeTokenClient::new(&e, &e.register_contract(None, MeTokenContract {}));
        engine.initialize(
            &bombadil,
            &gandalf,
            &Params::default(),
            &bank.address,
            &leverage.address,
            &oracle.address,
            &auction,
        );

        TestFixture {
            env: e,
            bombadil,
            gandalf,
            auction,
            engine,
            bank,
            leverage,
            oracle,
        }
    }

    /// The me/USD index, backed by USDT, USDC and IST
    pub fn usd_index(&self) -> Index {
        let mut accepted_assets = vec![&self.env];
        for (token, target_allocation) in TOKENS.iter().zip([33, 34, 33]) {
            accepted_assets.push_back(AcceptedAsset {
                denom: String::from_str(&self.env, token.denom),
                reserve_portion: SCALAR_18 / 5,
                target_allocation: target_allocation * SCALAR_18 / 100,
            });
        }
        Index {
            denom: self.denom(ME_USD),
            max_supply: 1_000_000_000000,
            exponent: 6,
            fee: Fee {
                min_fee: SCALAR_18 / 100,
                balanced_fee: SCALAR_18 / 5,
                max_fee: SCALAR_18 / 2,
            },
            accepted_assets,
        }
    }

    pub fn denom(&self, denom: &str) -> String {
        String::from_str(&self.env, denom)
    }

    pub fn token(&self, token: TokenIndex) -> String {
        self.denom(TOKENS[token as usize].denom)
    }

    pub fn coin(&self, denom: &String, amount: i128) -> Coin {
        Coin {
            denom: denom.clone(),
            amount,
        }
    }

    /// Mint `amount` of an asset to `user` and swap it for meTokens
    pub fn mint_and_swap(&self, user: &Address, denom: &String, amount: i128) -> i128 {
        self.bank.mint(user, denom, &amount);
        let response = self
            .engine
            .swap(user, &self.coin(denom, amount), &self.denom(ME_USD));
        response.returned.amount
    }

    pub fn balances(&self) -> IndexBalances {
        self.engine
            .index_balances(&Some(self.denom(ME_USD)))
            .get_unchecked(0)
    }

    /// Fetch the amount of an asset the engine has supplied to the leverage contract
    pub fn leveraged(&self, denom: &String) -> i128 {
        self.leverage
            .supplied(&self.engine.address)
            .iter()
            .find(|coin| coin.denom == *denom)
            .map_or(0, |coin| coin.amount)
    }

    /// Assert that the bookkeeping of every asset of the index matches the coins the engine
    /// actually holds in the bank and in the leverage contract
    pub fn assert_backed(&self) {
        for balance in self.balances().asset_balances.iter() {
            assert_eq!(
                self.bank.balance(&self.engine.address, &balance.denom),
                balance.reserved + balance.fees + balance.interest
            );
            assert_eq!(self.leveraged(&balance.denom), balance.leveraged);
        }
    }

    /********** Chain Helpers ***********/

    pub fn jump(&self, time: u64) {
        let blocks = time / 5;
        self.env.ledger().set(LedgerInfo {
            timestamp: self.env.ledger().timestamp().saturating_add(time),
            protocol_version: 20,
            sequence_number: self.env.ledger().sequence().saturating_add(blocks as u32),
            network_id: Default::default(),
            base_reserve: 10,
            min_temp_entry_ttl: 10,
            min_persistent_entry_ttl: 500000,
            max_entry_ttl: 9999999,
        });
    }
}

/// Create a TestFixture with the me/USD index registered
pub fn create_fixture_with_index<'a>() -> TestFixture<'a> {
    let fixture = TestFixture::create();
    let index = fixture.usd_index();
    fixture
        .engine
        .gov_update_registry(&fixture.bombadil, &vec![&fixture.env, index], &vec![&fixture.env]);
    fixture
}
