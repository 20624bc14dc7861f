//! Helper macro for declaring driven-port error enums.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! fields accept anything convertible into the declared type, so adapters can
//! write `TaskRepositoryError::query(err.to_string())` or pass a `&str`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum StoreError {
            Offline => "store offline",
            Rejected { reason: String } => "rejected: {reason}",
            Throttled { retry_after_secs: u64 } => "throttled for {retry_after_secs}s",
            Partial { reason: String, written: u64 } => "partial write of {written}: {reason}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(StoreError::offline(), StoreError::Offline);
        assert_eq!(StoreError::offline().to_string(), "store offline");
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(
            StoreError::rejected("duplicate").to_string(),
            "rejected: duplicate"
        );
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        let err = StoreError::throttled(30_u64);
        assert_eq!(
            err,
            StoreError::Throttled {
                retry_after_secs: 30
            }
        );
    }

    #[test]
    fn mixed_fields_are_taken_in_declaration_order() {
        let err = StoreError::partial("disk full", 7_u64);
        assert_eq!(err.to_string(), "partial write of 7: disk full");
    }
}
