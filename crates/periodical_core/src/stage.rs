use std::fmt;

/// Assembly stages, in the only order a run moves through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    Populate,
    Normalize,
    Group,
    Materialize,
    Render,
    Compile,
    Finalize,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Init,
        Stage::Populate,
        Stage::Normalize,
        Stage::Group,
        Stage::Materialize,
        Stage::Render,
        Stage::Compile,
        Stage::Finalize,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Populate => "populate",
            Stage::Normalize => "normalize",
            Stage::Group => "group",
            Stage::Materialize => "materialize",
            Stage::Render => "render",
            Stage::Compile => "compile",
            Stage::Finalize => "finalize",
        };
        f.write_str(name)
    }
}
