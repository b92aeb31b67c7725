// Licensed under the Apache-2.0 license

pub mod context;
pub mod hmac;
pub mod oneshot;
pub mod word;

pub use context::{Lifecycle, Sha1Context, Sha256Context, Sha512Context, ShaContext};
pub use hmac::{hmac, HmacContext, HmacSha1, HmacSha256, HmacSha512};
pub use oneshot::{digest, sha1, sha224, sha256, sha384, sha512};
