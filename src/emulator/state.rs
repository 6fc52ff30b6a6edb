use std::collections::{ BTreeMap, HashMap, VecDeque };
use std::time::Duration ;

use crate::error::{ HostError, HostResult };
use crate::header_map::HeaderMap ;
use crate::stream::StreamState ;
use crate::types::{ LogLevel, MetricType };
use super::options::{ EmulatorOptions, ForeignFunction };



/// Context id of the plugin's root context.
pub const ROOT_CONTEXT_ID: u32 = 1 ;

/// A value in the shared key-value store and its version.
#[derive( Debug, Clone, PartialEq, Eq )]
pub(crate) struct SharedEntry {
	pub(crate) value: Vec<u8>,
	pub(crate) cas: u32,
}

#[derive( Debug, Clone, PartialEq, Eq )]
pub(crate) struct SharedQueue {
	pub(crate) vm_id: String,
	pub(crate) name: String,
	pub(crate) items: VecDeque<Vec<u8>>,
}

#[derive( Debug, Clone, PartialEq, Eq )]
pub(crate) struct Metric {
	pub(crate) metric_type: MetricType,
	pub(crate) name: String,
	pub(crate) value: u64,
}

/// An outbound HTTP request a guest started and the host has not yet answered.
#[derive( Debug, Clone, PartialEq, Eq )]
pub struct HttpCalloutAttributes {
	pub callout_id: u32,
	/// The context that made the call and receives the response.
	pub context_id: u32,
	pub upstream: String,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
	pub trailers: HeaderMap,
	pub timeout: Duration,
}

/// The response being delivered to `on_http_call_response`.
#[derive( Debug, Clone, Default, PartialEq, Eq )]
pub(crate) struct CalloutResponse {
	pub(crate) headers: HeaderMap,
	pub(crate) body: Vec<u8>,
	pub(crate) trailers: HeaderMap,
}

/// Everything the emulated host knows.
///
/// Owned by the [`HostEmulator`]( super::HostEmulator ) and lent to one
/// [`HostSession`]( super::HostSession ) per guest callback.
#[derive( Default )]
pub struct HostState {
	pub(crate) vm_id: String,
	pub(crate) vm_configuration: Vec<u8>,
	pub(crate) plugin_configuration: Vec<u8>,
	pub(crate) properties: HashMap<Vec<u8>, Vec<u8>>,
	pub(crate) foreign_functions: HashMap<String, ForeignFunction>,

	pub(crate) last_context_id: u32,
	pub(crate) root_created: bool,
	pub(crate) streams: HashMap<u32, StreamState>,

	pub(crate) shared_data: HashMap<Vec<u8>, SharedEntry>,
	pub(crate) queues: Vec<SharedQueue>,
	pub(crate) metrics: Vec<Metric>,

	pub(crate) last_callout_id: u32,
	pub(crate) callouts: BTreeMap<u32, HttpCalloutAttributes>,
	pub(crate) callout_response: Option<CalloutResponse>,

	pub(crate) tick_period: Duration,
	pub(crate) logs: BTreeMap<LogLevel, Vec<String>>,
	pub(crate) done: bool,
}

impl std::fmt::Debug for HostState {
	fn fmt( &self, f: &mut std::fmt::Formatter<'_> ) -> std::fmt::Result {
		f.debug_struct( "HostState" )
			.field( "vm_id", &self.vm_id )
			.field( "streams", &self.streams )
			.field( "shared_data", &self.shared_data.len() )
			.field( "queues", &self.queues.len() )
			.field( "metrics", &self.metrics )
			.field( "callouts", &self.callouts )
			.field( "tick_period", &self.tick_period )
			.field( "done", &self.done )
			.finish_non_exhaustive()
	}
}

impl From<EmulatorOptions> for HostState {
	fn from( options: EmulatorOptions ) -> Self {
		Self {
			vm_id: options.vm_id,
			vm_configuration: options.vm_configuration,
			plugin_configuration: options.plugin_configuration,
			properties: options.properties,
			foreign_functions: options.foreign_functions,
			..Self::default()
		}
	}
}

impl HostState {

	pub(crate) fn next_context_id( &mut self ) -> u32 {
		self.last_context_id += 1 ;
		self.last_context_id
	}

	pub(crate) fn next_callout_id( &mut self ) -> u32 {
		self.last_callout_id += 1 ;
		self.last_callout_id
	}

	/// Whether host calls may act on `context_id`.
	pub(crate) fn is_live( &self, context_id: u32 ) -> bool {
		match context_id == ROOT_CONTEXT_ID {
			true => self.root_created,
			false => self.streams.get( &context_id ).is_some_and(| stream | !stream.is_deleted() ),
		}
	}

	pub(crate) fn queue_id( &self, vm_id: &str, name: &str ) -> Option<u32> {
		self.queues.iter()
			.position(| queue | queue.vm_id == vm_id && queue.name == name )
			.map( slot_id )
	}

	pub(crate) fn queue_mut( &mut self, queue_id: u32 ) -> HostResult<&mut SharedQueue> {
		slot_index( queue_id ).and_then(| index | self.queues.get_mut( index )).ok_or( HostError::NotFound )
	}

	pub(crate) fn queue( &self, queue_id: u32 ) -> HostResult<&SharedQueue> {
		slot_index( queue_id ).and_then(| index | self.queues.get( index )).ok_or( HostError::NotFound )
	}

	pub(crate) fn metric_id( &self, metric_type: MetricType, name: &str ) -> Option<u32> {
		self.metrics.iter()
			.position(| metric | metric.metric_type == metric_type && metric.name == name )
			.map( slot_id )
	}

	pub(crate) fn metric_mut( &mut self, metric_id: u32 ) -> HostResult<&mut Metric> {
		slot_index( metric_id ).and_then(| index | self.metrics.get_mut( index )).ok_or( HostError::NotFound )
	}

	pub(crate) fn record_log( &mut self, level: LogLevel, message: String ) {
		self.logs.entry( level ).or_default().push( message );
	}

}

// Queue and metric ids are 1-based slots; 0 is never handed out.
#[allow( clippy::cast_possible_truncation )]
fn slot_id( index: usize ) -> u32 { index as u32 + 1 }

fn slot_index( id: u32 ) -> Option<usize> { ( id as usize ).checked_sub( 1 ) }
