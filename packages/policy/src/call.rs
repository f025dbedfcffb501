//! The routed filesystem calls and their categories.
//!
//! Call names arrive as strings on the mount surface (`func.<name>=<policy>`)
//! but are dispatched internally through a closed enum so that a typo is a
//! parse error at mount time, not a silently ignored binding.

use std::fmt;
use std::str::FromStr;

/// The three kinds of branch selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Read an existing path (getattr, open, readlink, ...).
    Search,
    /// Place a brand-new path (create, mkdir, ...).
    Create,
    /// Mutate an existing path (chmod, rename, truncate, ...).
    Action,
}

impl Category {
    /// Every category, in a fixed order.
    pub const ALL: [Category; 3] = [Category::Search, Category::Create, Category::Action];

    /// The name used on the mount surface (`category.<name>=<policy>`).
    pub fn name(&self) -> &'static str {
        match self {
            Category::Search => "search",
            Category::Create => "create",
            Category::Action => "action",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search" => Ok(Category::Search),
            "create" => Ok(Category::Create),
            "action" => Ok(Category::Action),
            _ => Err(()),
        }
    }
}

macro_rules! fs_calls {
    ($( $variant:ident => ($name:literal, $category:ident) ),+ $(,)?) => {
        /// A filesystem call routed through the policy engine.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum FsCall {
            $( $variant, )+
        }

        impl FsCall {
            /// Every routed call, in a fixed order. Index with `call as usize`.
            pub const ALL: [FsCall; fs_calls!(@count $($variant)+)] = [ $( FsCall::$variant, )+ ];

            /// The name used on the mount surface (`func.<name>=<policy>`).
            pub fn name(&self) -> &'static str {
                match self {
                    $( FsCall::$variant => $name, )+
                }
            }

            /// Which selection category this call belongs to.
            pub fn category(&self) -> Category {
                match self {
                    $( FsCall::$variant => Category::$category, )+
                }
            }
        }

        impl FromStr for FsCall {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $name => Ok(FsCall::$variant), )+
                    _ => Err(()),
                }
            }
        }
    };
    (@count $($x:ident)+) => { 0usize $( + fs_calls!(@one $x) )+ };
    (@one $x:ident) => { 1usize };
}

fs_calls! {
    Access      => ("access", Search),
    Chmod       => ("chmod", Action),
    Chown       => ("chown", Action),
    Create      => ("create", Create),
    Getattr     => ("getattr", Search),
    Getxattr    => ("getxattr", Search),
    Link        => ("link", Action),
    Listxattr   => ("listxattr", Search),
    Mkdir       => ("mkdir", Create),
    Mknod       => ("mknod", Create),
    Open        => ("open", Search),
    Readlink    => ("readlink", Search),
    Removexattr => ("removexattr", Action),
    Rename      => ("rename", Action),
    Rmdir       => ("rmdir", Action),
    Setxattr    => ("setxattr", Action),
    Symlink     => ("symlink", Create),
    Truncate    => ("truncate", Action),
    Unlink      => ("unlink", Action),
    Utimens     => ("utimens", Action),
}

impl fmt::Display for FsCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
