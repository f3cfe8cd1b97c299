// Account- and tag-level service paths.
//
// Sensor-specific paths (arm/disarm/config) live in the core crate's
// endpoint table.

pub const SIGN_IN: &str = "/ethAccount.asmx/SignIn";
pub const IS_SIGNED_IN: &str = "/ethAccount.asmx/IsSignedIn";
pub const SIGN_OUT: &str = "/ethAccount.asmx/SignOut";
pub const GET_TAG_MANAGERS: &str = "/ethAccount.asmx/GetTagManagers";
pub const SELECT_TAG_MANAGER: &str = "/ethAccount.asmx/SelectTagManager";
pub const GET_TAG_LIST: &str = "/ethClient.asmx/GetTagList";
pub const GET_TAG_FOR_SLAVE_ID: &str = "/ethClient.asmx/GetTagForSlaveId";
