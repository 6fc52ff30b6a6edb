mod event_log {

	use std::cell::RefCell ;
	use std::rc::Rc ;

	/// Shared record of what guest contexts observed, in order.
	#[derive( Debug, Clone, Default )]
	pub struct EventLog( Rc<RefCell<Vec<String>>> );

	impl EventLog {
		pub fn push( &self, event: impl Into<String> ) { self.0.borrow_mut().push( event.into() ) }
		pub fn events( &self ) -> Vec<String> { self.0.borrow().clone() }
	}

}
