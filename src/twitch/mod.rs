// Twitch Helix API access: authenticated client, follower pagination,
// batched channel lookup, and user operations.

pub mod channels;
pub mod client;
pub mod followers;
pub mod users;
