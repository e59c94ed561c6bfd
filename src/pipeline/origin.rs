//! Call-site capture for errors that surface long after the caller was suspended.

// std
use std::{
	backtrace::{Backtrace, BacktraceStatus},
	panic::Location,
};
// self
use crate::_prelude::*;

/// Location (and, when `RUST_BACKTRACE` is set, the stack) of the code that issued a request.
///
/// Captured synchronously before the first suspension point so the report still names the
/// originating call path when the failure is observed deep inside transport code.
#[derive(Clone, Debug)]
pub struct CallSite {
	location: &'static Location<'static>,
	backtrace: Arc<Backtrace>,
}
impl CallSite {
	/// Captures the caller's location and backtrace.
	#[track_caller]
	pub fn capture() -> Self {
		Self { location: Location::caller(), backtrace: Arc::new(Backtrace::capture()) }
	}

	/// Source location of the caller.
	pub fn location(&self) -> &'static Location<'static> {
		self.location
	}

	/// Stack captured at the call site; empty unless backtraces are enabled.
	pub fn backtrace(&self) -> &Backtrace {
		&self.backtrace
	}
}
impl Display for CallSite {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "at {}", self.location)?;

		if self.backtrace.status() == BacktraceStatus::Captured {
			write!(f, "\n{}", self.backtrace)?;
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn capture_records_the_calling_line() {
		let line = line!() + 1;
		let site = CallSite::capture();

		assert_eq!(site.location().file(), file!());
		assert_eq!(site.location().line(), line);
		assert!(site.to_string().starts_with(&format!("at {}:{line}", file!())));
	}
}
