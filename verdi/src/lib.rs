//! Verticle runtime shim with per-instance dependency injection.
//!
//! A *verticle* is a unit of deployable logic whose lifecycle (init, start,
//! stop) is managed by a host runtime. This crate bridges that lifecycle with
//! the [verdi_di] service locator: the [VerticleLoader](loader::VerticleLoader)
//! stands in for the real verticle, resolves its class by name when started
//! (compiling source units through the resolver's source table first),
//! assembles a locator scoped to that one instance from the binders declared
//! in deployment configuration, instantiates the verticle through the locator
//! so its dependencies are injected, and then forwards the verticle's own
//! asynchronous start/stop results untouched.
//!
//! Binder and verticle classes are registered at process start through
//! [inventory] submissions (see [registry]), which gives configuration-driven,
//! name-based loading over a fixed, closed set of known classes.

pub mod binder;
pub mod config;
pub mod lifecycle;
pub mod loader;
pub mod registry;
pub mod resolver;
pub mod runtime;
