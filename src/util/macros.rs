// Copyright (c) 2023 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

/// Return an error result from a handler returning a [`actix::ResponseActFuture`].
macro_rules! return_fut_err {
    ($result:expr) => {
        return Box::pin(actix::fut::result(Err($result)))
    };
}

pub(crate) use return_fut_err;
