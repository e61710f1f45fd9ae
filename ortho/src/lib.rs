//! # `ortho`
//!
//! Batteries-included crate for orthocorrecting aerial photographs
//!
//! This crate gathers the orthocorrection crates in one place. If you only need part of the
//! pipeline, depend on the individual crates or disable the default features of this crate and
//! enable just the ones you want.
//!
//! All of the basic types (attitude, ground offsets, canvas layouts and warp plans) are included
//! in the root of the crate.
//!
//! ## Modules
//! * [`geom`] - sight line projection, footprints and canvas mapping
//! * [`warp`] - warp planning, rasterization and image storage
//! * [`protocol`] - the JSON control protocol of a correction session

pub use ortho_core::*;

/// Sight line projection, footprints and canvas mapping
pub mod geom {
    #[cfg(feature = "geom")]
    pub use ortho_geom::*;
}

/// Warp planning, rasterization and image storage
pub mod warp {
    #[cfg(feature = "warp")]
    pub use ortho_warp::*;
}

/// The JSON control protocol of a correction session
pub mod protocol {
    #[cfg(feature = "protocol")]
    pub use ortho_protocol::*;
}
