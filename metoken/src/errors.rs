use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
/// Error codes for the meToken contract. Common errors are codes that match up with the built-in
/// contracts error reporting. meToken specific errors start at 1500.
pub enum MeTokenError {
    // Common Errors
    InternalError = 1,
    AlreadyInitializedError = 3,

    UnauthorizedError = 4,

    NegativeAmountError = 8,
    BalanceError = 10,
    OverflowError = 12,

    // Request Errors (start at 1500)
    InvalidRequest = 1500,
    IndexNotFound = 1501,
    BalanceNotFound = 1502,
    DenomNotAccepted = 1503,

    // Oracle Errors
    PriceUnavailable = 1504,

    // Swap and Redeem Errors
    MaxSupplyExceeded = 1505,
    InsufficientForSwap = 1506,
    InsufficientForRedeem = 1507,
    EmptyIndex = 1508,
    InsufficientLiquidity = 1509,

    // Collaborator Errors
    ExternalTransferFailed = 1510,
    LeverageFailure = 1511,

    // Registry Errors
    IndexAlreadyExists = 1512,
    AssetAlreadyRegistered = 1513,
    UnknownAsset = 1514,
    ExponentFrozen = 1515,
    AssetRemovalForbidden = 1516,
    EmergencyChangeForbidden = 1517,
    InvalidParams = 1518,
}
