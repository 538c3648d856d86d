macro_rules! nutype_string {
    ($ident:ident ( $($opts:tt)* )) => {
        #[::nutype::nutype(
            sanitize(trim),
            $($opts)*,
            derive(Debug, Clone, PartialEq, Eq, Deref, TryFrom, Serialize, Deserialize)
        )]
        pub struct $ident(String);
    };
}

pub(crate) use nutype_string;
