/// `serve` subcommand implementation.
mod serve;

pub(crate) use serve::serve;
