//! Common error type.

use crate::eval::Error as EvalError;
use crate::expr::AmbiguousReference;
use crate::graph::Error as GraphError;
use crate::names::Error as NamesError;

/// Common error type.
#[derive(Debug)]
pub enum Error {
    Names(NamesError),
    Graph(GraphError),
    Eval(EvalError),
    Ambiguous(AmbiguousReference),
}

impl From<NamesError> for Error {
    fn from(err: NamesError) -> Self {
        Self::Names(err)
    }
}

impl From<GraphError> for Error {
    fn from(err: GraphError) -> Self {
        Self::Graph(err)
    }
}

impl From<EvalError> for Error {
    fn from(err: EvalError) -> Self {
        Self::Eval(err)
    }
}

impl From<AmbiguousReference> for Error {
    fn from(err: AmbiguousReference) -> Self {
        Self::Ambiguous(err)
    }
}
