// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// A specialized `Result` type for switchboard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error raised while deploying or applying a switchboard.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Resolving the declared references failed.
    #[error(transparent)]
    Resolve(#[from] switchboard_resolve::Error),

    /// Building or applying an injector failed.
    #[error(transparent)]
    Inject(#[from] switchboard_inject::Error),
}
