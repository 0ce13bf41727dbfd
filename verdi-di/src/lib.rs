//! Per-instance dependency injection based on composable binding modules.
//!
//! The central type is the [ServiceLocator](locator::ServiceLocator) - a small
//! service registry scoped to a single client instance. Locators are never
//! cached or shared: every [create](locator::ServiceLocator::create) call
//! returns an independent locator, which makes it possible to give each
//! deployed component its own injected state.
//!
//! Bindings are contributed by [Binders](binder::Binder) - modules which
//! register service instances or providers with the locator. Once bound, the
//! locator can [create and initialize](locator::ServiceLocator::create_and_initialize)
//! an instance of a client type, aggregating every unsatisfied dependency into
//! a single [MultiError](error::MultiError) instead of stopping at the first
//! one.

pub mod binder;
pub mod error;
pub mod locator;
pub mod service;
