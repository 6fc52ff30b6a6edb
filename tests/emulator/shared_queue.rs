use proxy_wasm_link::{
	Context, DispatchError, Dispatcher, EmulatorOptions, HostEmulator, HostError, HostSession, HostState,
	Hostcalls, RootContext, ROOT_CONTEXT_ID,
};
use crate::event_log::EventLog ;

fn with_host<T>( state: &mut HostState, call: impl FnOnce( &mut Hostcalls<'_> ) -> T ) -> T {
	let mut session = HostSession::new( state, ROOT_CONTEXT_ID );
	call( &mut Hostcalls::new( &mut session ))
}

#[test]
fn registering_twice_returns_the_same_queue() {
	let mut state = HostState::default();
	with_host( &mut state, | host | {
		let first = host.register_shared_queue( "jobs" ).expect( "register" );
		assert_eq!( host.register_shared_queue( "jobs" ), Ok( first ));
		assert_ne!( host.register_shared_queue( "other" ), Ok( first ));
		assert_eq!( host.resolve_shared_queue( "", "jobs" ), Ok( first ));
	});
}

#[test]
fn queues_are_first_in_first_out() {
	let mut state = HostState::default();
	with_host( &mut state, | host | {
		let queue = host.register_shared_queue( "jobs" ).expect( "register" );
		host.enqueue_shared_queue( queue, b"one" ).expect( "enqueue" );
		host.enqueue_shared_queue( queue, b"two" ).expect( "enqueue" );

		assert_eq!( host.dequeue_shared_queue( queue ), Ok( b"one".to_vec() ));
		assert_eq!( host.dequeue_shared_queue( queue ), Ok( b"two".to_vec() ));
		assert_eq!( host.dequeue_shared_queue( queue ), Err( HostError::Empty ));
	});
}

#[test]
fn unknown_queues_are_not_found() {
	let mut state = HostState::default();
	with_host( &mut state, | host | {
		assert_eq!( host.resolve_shared_queue( "", "missing" ), Err( HostError::NotFound ));
		assert_eq!( host.enqueue_shared_queue( 7, b"x" ), Err( HostError::NotFound ));
		assert_eq!( host.dequeue_shared_queue( 7 ), Err( HostError::NotFound ));
	});
}

#[test]
fn queues_are_scoped_by_vm_id() {
	let mut state = HostState::from( EmulatorOptions::new().with_vm_id( "edge" ));
	with_host( &mut state, | host | {
		let queue = host.register_shared_queue( "jobs" ).expect( "register" );
		assert_eq!( host.resolve_shared_queue( "edge", "jobs" ), Ok( queue ));
		assert_eq!( host.resolve_shared_queue( "", "jobs" ), Err( HostError::NotFound ));
	});
}

/// Drains its queue whenever the host reports it ready.
struct Worker {
	events: EventLog,
}

impl Context for Worker {}

impl RootContext for Worker {

	fn on_configure( &mut self, host: &mut Hostcalls<'_>, _plugin_configuration_size: usize ) -> bool {
		host.register_shared_queue( "jobs" )
			.and_then(| queue | host.enqueue_shared_queue( queue, b"resize" ))
			.is_ok()
	}

	fn on_queue_ready( &mut self, host: &mut Hostcalls<'_>, queue_id: u32 ) {
		while let Ok( job ) = host.dequeue_shared_queue( queue_id ) {
			self.events.push( String::from_utf8_lossy( &job ));
		}
	}

}

#[test]
fn queue_ready_is_delivered_to_the_root_context() {
	let events = EventLog::default();
	let log = events.clone();
	let mut host = HostEmulator::new( Dispatcher::new( move | _ | Worker { events: log.clone() }));
	assert!( host.start_plugin().expect( "plugin start" ));
	assert_eq!( host.get_queue_size( 1 ), Ok( 1 ));

	host.call_on_queue_ready( 1 ).expect( "queue ready" );

	assert_eq!( events.events(), vec![ "resize" ]);
	assert_eq!( host.get_queue_size( 1 ), Ok( 0 ));
	assert_eq!( host.get_queue_size( 2 ), Err( HostError::NotFound ));
}

#[test]
fn queue_ready_for_an_unknown_queue_fails() {
	let events = EventLog::default();
	let log = events.clone();
	let mut host = HostEmulator::new( Dispatcher::new( move | _ | Worker { events: log.clone() }));

	match host.call_on_queue_ready( 3 ) {
		Err( DispatchError::Host( HostError::NotFound )) => {}
		other => panic!( "Expected NotFound, got: {:#?}", other ),
	}
	assert!( events.events().is_empty() );
}
