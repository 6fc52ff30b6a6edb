use proxy_wasm_link::{
	Action, Context, Dispatcher, HostEmulator, HostError, HostSession, HostState,
	Hostcalls, HttpContext, MetricType, ROOT_CONTEXT_ID,
};

fn with_host<T>( state: &mut HostState, call: impl FnOnce( &mut Hostcalls<'_> ) -> T ) -> T {
	let mut session = HostSession::new( state, ROOT_CONTEXT_ID );
	call( &mut Hostcalls::new( &mut session ))
}

struct HitCounter ;

impl Context for HitCounter {}

impl HttpContext for HitCounter {
	fn on_http_request_headers( &mut self, host: &mut Hostcalls<'_>, _num_headers: usize, _end_of_stream: bool ) -> Action {
		let _ = host.define_metric( MetricType::Counter, "hits" )
			.and_then(| hits | host.increment_metric( hits, 1 ));
		Action::Continue
	}
}

#[test]
fn counter_is_shared_by_every_context() {
	let mut host = HostEmulator::new( Dispatcher::for_http(| _ | HitCounter ));
	for _ in 0..3 {
		let stream = host.initialize_http_context().expect( "stream" );
		host.call_on_request_headers( stream, [( ":path", "/" )], true ).expect( "headers" );
	}
	assert_eq!( host.get_metric( MetricType::Counter, "hits" ), Ok( 3 ));
	assert_eq!( host.get_metric( MetricType::Gauge, "hits" ), Err( HostError::NotFound ));
}

#[test]
fn defining_twice_returns_the_same_id() {
	let mut state = HostState::default();
	with_host( &mut state, | host | {
		let hits = host.define_metric( MetricType::Counter, "hits" ).expect( "define" );
		assert_eq!( host.define_metric( MetricType::Counter, "hits" ), Ok( hits ));
		assert_ne!( host.define_metric( MetricType::Gauge, "hits" ), Ok( hits ));
	});
}

#[test]
fn counters_only_increment() {
	let mut state = HostState::default();
	with_host( &mut state, | host | {
		let hits = host.define_metric( MetricType::Counter, "hits" ).expect( "define" );
		host.increment_metric( hits, 5 ).expect( "increment" );
		host.increment_metric( hits, -2 ).expect( "decrement" );
		assert_eq!( host.get_metric( hits ), Ok( 3 ));
		assert_eq!( host.record_metric( hits, 10 ), Err( HostError::BadArgument ));
	});
}

#[test]
fn gauges_are_recorded() {
	let mut state = HostState::default();
	with_host( &mut state, | host | {
		let in_flight = host.define_metric( MetricType::Gauge, "in_flight" ).expect( "define" );
		host.record_metric( in_flight, 12 ).expect( "record" );
		assert_eq!( host.get_metric( in_flight ), Ok( 12 ));
		assert_eq!( host.increment_metric( in_flight, 1 ), Err( HostError::BadArgument ));
	});
}

#[test]
fn unknown_metric_ids_are_not_found() {
	let mut state = HostState::default();
	with_host( &mut state, | host | {
		assert_eq!( host.get_metric( 0 ), Err( HostError::NotFound ));
		assert_eq!( host.increment_metric( 4, 1 ), Err( HostError::NotFound ));
		assert_eq!( host.record_metric( 4, 1 ), Err( HostError::NotFound ));
	});
}

#[test]
fn counters_do_not_go_below_zero() {
	let mut state = HostState::default();
	with_host( &mut state, | host | {
		let hits = host.define_metric( MetricType::Counter, "hits" ).expect( "define" );
		host.increment_metric( hits, 2 ).expect( "increment" );
		assert_eq!( host.increment_metric( hits, -3 ), Err( HostError::BadArgument ));
		assert_eq!( host.get_metric( hits ), Ok( 2 ));
	});
}
