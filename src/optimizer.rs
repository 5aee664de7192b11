/// Knobs of a join enumeration run.
#[derive(Clone, Debug)]
pub struct OptimizerContext {
    /// Reject graphs whose relation graph is disconnected before searching.
    connectivity_precheck: bool,
    /// Log the final memo table at debug level.
    dump_memo: bool,
}

impl Default for OptimizerContext {
    fn default() -> Self {
        Self {
            connectivity_precheck: true,
            dump_memo: false,
        }
    }
}

impl OptimizerContext {
    pub fn with_connectivity_precheck(mut self, enabled: bool) -> Self {
        self.connectivity_precheck = enabled;
        self
    }

    pub fn with_dump_memo(mut self, enabled: bool) -> Self {
        self.dump_memo = enabled;
        self
    }

    pub fn connectivity_precheck(&self) -> bool {
        self.connectivity_precheck
    }

    pub fn dump_memo(&self) -> bool {
        self.dump_memo
    }
}
