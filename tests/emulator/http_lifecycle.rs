use proxy_wasm_link::{ Action, Context, DispatchError, Dispatcher, HostEmulator, Hostcalls, HttpContext };
use crate::event_log::EventLog ;

struct Recorder {
	context_id: u32,
	events: EventLog,
}

impl Context for Recorder {
	fn on_log( &mut self, host: &mut Hostcalls<'_> ) {
		let path = host.get_http_request_header( ":path" ).unwrap_or_default();
		self.events.push( format!( "log {} {}", self.context_id, path ));
	}
}

impl HttpContext for Recorder {

	fn on_http_request_headers( &mut self, host: &mut Hostcalls<'_>, num_headers: usize, end_of_stream: bool ) -> Action {
		self.events.push( format!( "request headers {num_headers} {end_of_stream}" ));
		let _ = host.add_http_request_header( "x-seen-by", "recorder" );
		let _ = host.remove_http_request_header( "x-secret" );
		Action::Continue
	}

	fn on_http_request_trailers( &mut self, host: &mut Hostcalls<'_>, _num_trailers: usize ) -> Action {
		let _ = host.add_http_request_trailer( "x-checksum", "ok" );
		Action::Continue
	}

	fn on_http_response_headers( &mut self, host: &mut Hostcalls<'_>, _num_headers: usize, _end_of_stream: bool ) -> Action {
		let _ = host.replace_http_response_header( "server", "emulated" );
		Action::Pause
	}

}

impl Drop for Recorder {
	fn drop( &mut self ) { self.events.push( format!( "delete {}", self.context_id )) }
}

fn emulator( events: &EventLog ) -> HostEmulator {
	let events = events.clone();
	let mut host = HostEmulator::new( Dispatcher::for_http( move | context_id | Recorder { context_id, events: events.clone() }));
	assert!( host.start_plugin().expect( "failed to start plugin" ));
	host
}

#[test]
fn stream_ids_follow_the_root_context() {
	let mut host = emulator( &EventLog::default() );
	assert_eq!( host.initialize_http_context().expect( "stream" ), 2 );
	assert_eq!( host.initialize_http_context().expect( "stream" ), 3 );
}

#[test]
fn request_headers_are_delivered_and_edited() {
	let events = EventLog::default();
	let mut host = emulator( &events );
	let stream = host.initialize_http_context().expect( "stream" );

	let action = host.call_on_request_headers( stream, [( ":path", "/a" ), ( "X-Secret", "1" )], true )
		.expect( "request headers" );

	assert_eq!( action, Action::Continue );
	let headers = host.get_current_request_headers( stream );
	assert_eq!( headers.get( "x-seen-by" ), Some( "recorder" ));
	assert_eq!( headers.get( "x-secret" ), None );
	assert_eq!( events.events(), vec![ "request headers 2 true" ]);
}

#[test]
fn response_action_is_recorded() {
	let mut host = emulator( &EventLog::default() );
	let stream = host.initialize_http_context().expect( "stream" );

	let action = host.call_on_response_headers( stream, [( ":status", "200" ), ( "server", "envoy" )], false )
		.expect( "response headers" );

	assert_eq!( action, Action::Pause );
	assert_eq!( host.get_current_http_stream_action( stream ), Action::Pause );
	assert_eq!( host.get_current_response_headers( stream ).get( "server" ), Some( "emulated" ));
}

#[test]
fn trailers_are_editable() {
	let mut host = emulator( &EventLog::default() );
	let stream = host.initialize_http_context().expect( "stream" );
	host.call_on_request_trailers( stream, [( "grpc-status", "0" )]).expect( "request trailers" );
	assert_eq!( host.get_current_request_trailers( stream ).get( "x-checksum" ), Some( "ok" ));
	assert_eq!( host.get_current_request_trailers( stream ).get( "grpc-status" ), Some( "0" ));
}

#[test]
fn completion_logs_before_deleting() {
	let events = EventLog::default();
	let mut host = emulator( &events );
	let stream = host.initialize_http_context().expect( "stream" );
	host.call_on_request_headers( stream, [( ":path", "/done" )], false ).expect( "request headers" );

	host.complete_http_context( stream ).expect( "completion" );

	assert_eq!( events.events(), vec![ "request headers 1 false", "log 2 /done", "delete 2" ]);
}

#[test]
fn completed_streams_refuse_further_events() {
	let mut host = emulator( &EventLog::default() );
	let stream = host.initialize_http_context().expect( "stream" );
	host.call_on_request_headers( stream, [( ":path", "/" )], true ).expect( "request headers" );
	host.complete_http_context( stream ).expect( "completion" );

	match host.call_on_response_headers( stream, [( ":status", "200" )], true ) {
		Err( DispatchError::ContextDeleted( id )) if id == stream => {}
		other => panic!( "Expected ContextDeleted, got: {:#?}", other ),
	}
	match host.complete_http_context( stream ) {
		Err( DispatchError::ContextDeleted( id )) if id == stream => {}
		other => panic!( "Expected ContextDeleted, got: {:#?}", other ),
	}
	assert_eq!( host.get_current_request_headers( stream ).get( ":path" ), Some( "/" ));
}

#[test]
#[should_panic( expected = "invalid context id" )]
fn unknown_context_ids_panic() {
	let mut host = emulator( &EventLog::default() );
	let _ = host.call_on_request_headers( 42, [( ":path", "/" )], true );
}

#[test]
#[should_panic]
fn repeated_headers_panic() {
	let mut host = emulator( &EventLog::default() );
	let stream = host.initialize_http_context().expect( "stream" );
	let _ = host.call_on_request_headers( stream, [( ":path", "/" )], false );
	let _ = host.call_on_request_headers( stream, [( ":path", "/" )], false );
}
