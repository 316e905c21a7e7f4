//! Expression normaliser.
//!
//! Cancels value conversions that undo each other, so that marshalling round
//! trips can be compared structurally. Rewrites are bottom-up and only remove
//! code; nothing with a side effect is dropped.

use super::Expr;

/// Runtime-to-native and native-to-runtime conversion pairs: `(wrap, unwrap)`.
const INVERSE_PAIRS: &[(&str, &str)] = &[
    ("int_as_val", "val_as_int"),
    ("boolean_as_val", "val_as_boolean"),
    ("double_as_val_noenc", "val_as_double_noenc"),
    ("string_as_val", "val_as_string"),
    ("object_as_val", "val_as_object"),
];

fn inverse_of(func: &str) -> Option<&'static str> {
    INVERSE_PAIRS.iter().find_map(|&(wrap, unwrap)| {
        if func == wrap {
            Some(unwrap)
        } else if func == unwrap {
            Some(wrap)
        } else {
            None
        }
    })
}

/// Normalise an expression tree.
pub fn normalize(expr: Expr) -> Expr {
    match expr {
        Expr::Call { func, args } => {
            let mut args: Vec<Expr> = args.into_iter().map(normalize).collect();
            match (inverse_of(&func), args.len()) {
                (Some(inverse), 1) => match args.pop().map(|inner| strip_inverse(inner, inverse)) {
                    Some(Ok(cancelled)) => cancelled,
                    Some(Err(inner)) => Expr::call1(func, inner),
                    None => Expr::Call { func, args },
                },
                _ => Expr::Call { func, args },
            }
        }
        Expr::Cast { ty, expr } => match normalize(*expr) {
            // `(T)(T)e` is `(T)e`.
            Expr::Cast { ty: inner_ty, expr } if inner_ty == ty => Expr::Cast { ty, expr },
            inner => Expr::cast(ty, inner),
        },
        Expr::Deref(inner) => match normalize(*inner) {
            Expr::AddrOf(e) => *e,
            inner => inner.deref(),
        },
        Expr::AddrOf(inner) => match normalize(*inner) {
            Expr::Deref(e) => *e,
            inner => inner.addr_of(),
        },
        Expr::MethodCall {
            receiver,
            method,
            args,
        } => normalize(*receiver).method_call(method, args.into_iter().map(normalize).collect()),
        Expr::Arrow { base, field } => normalize(*base).arrow(field),
        Expr::Slot { object, index } => normalize(*object).slot(index),
        Expr::New { ty, args } => Expr::New {
            ty,
            args: args.into_iter().map(normalize).collect(),
        },
        Expr::Binary { op, lhs, rhs } => Expr::binary(op, normalize(*lhs), normalize(*rhs)),
        Expr::Lambda {
            params,
            body,
            returns,
        } => Expr::Lambda {
            params,
            body: Box::new(normalize(*body)),
            returns,
        },
        atom @ Expr::Ident(_) => atom,
    }
}

/// If `expr` is `inverse(e)`, possibly under value casts, return `e`.
///
/// Casts between the two conversions only adjust the native spelling of a
/// value that starts and ends in the same runtime representation.
fn strip_inverse(expr: Expr, inverse: &str) -> Result<Expr, Expr> {
    let mut cursor = &expr;
    while let Expr::Cast { expr: inner, .. } = cursor {
        cursor = inner;
    }
    match cursor {
        Expr::Call { func, args } if func == inverse && args.len() == 1 => {
            Ok(args[0].clone())
        }
        _ => Err(expr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn e() -> Expr {
        Expr::ident("e")
    }

    #[test]
    fn test_inverse_calls_cancel() {
        let round = Expr::call1("int_as_val", Expr::call1("val_as_int", e()));
        assert_eq!(normalize(round), e());
        let round = Expr::call1("val_as_string", Expr::call1("string_as_val", e()));
        assert_eq!(normalize(round), e());
    }

    #[test]
    fn test_casts_between_inverses_cancel() {
        let round = Expr::call1(
            "int_as_val",
            Expr::cast("int", Expr::cast("Align", Expr::call1("val_as_int", e()))),
        );
        assert_eq!(normalize(round), e());
    }

    #[test]
    fn test_mismatched_calls_stay() {
        let mixed = Expr::call1("int_as_val", Expr::call1("val_as_boolean", e()));
        assert_eq!(normalize(mixed.clone()), mixed);
    }

    #[test]
    fn test_repeated_cast_collapses() {
        let twice = Expr::cast("Foo*", Expr::cast("Foo*", e()));
        assert_eq!(normalize(twice), Expr::cast("Foo*", e()));
    }

    #[test]
    fn test_deref_addr_of_cancel() {
        assert_eq!(normalize(e().deref().addr_of()), e());
        assert_eq!(normalize(e().addr_of().deref()), e());
    }

    #[test]
    fn test_normalises_nested_arguments() {
        let nested = Expr::call(
            "f",
            vec![Expr::call1("boolean_as_val", Expr::call1("val_as_boolean", e()))],
        );
        assert_eq!(normalize(nested), Expr::call("f", vec![e()]));
    }
}
